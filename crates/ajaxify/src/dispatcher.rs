//! Request Dispatcher

use std::fmt;
use std::rc::Rc;

use ajaxify_net::Transport;

use crate::options::FinalOptions;

/// Hands finalized options to the transport, one call per event
#[derive(Clone)]
pub struct RequestDispatcher {
    transport: Rc<dyn Transport>,
}

impl RequestDispatcher {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fire-and-forget: no retry, no queueing
    pub fn dispatch(&self, options: FinalOptions) {
        let request = options.into_request();
        tracing::debug!("Dispatching {} {:?}", request.method_name(), request.url);
        self.transport.send(request);
    }
}

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher").finish_non_exhaustive()
    }
}
