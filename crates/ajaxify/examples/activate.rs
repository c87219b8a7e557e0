//! Activate a container on a small page and click around.
//!
//! Run with `RUST_LOG=debug` to see resolution and dispatch.

use std::rc::Rc;

use ajaxify::{
    AjaxResponse, ContainerConfig, DefaultAction, Page, RecordingTransport, ResponseBody,
    TextStatus,
};
use tracing_subscriber::EnvFilter;

const HTML: &str = r#"
<!DOCTYPE html>
<html>
<body>
    <div id="c1" class="widget">
        <a id="load" href="/x" data-ajax>Load</a>
        <a id="plain" href="/plain">Plain link</a>
        <form id="form" data-ajax action="/post">
            <input type="text" name="name" value="Fangxin"/>
            <input type="text" name="age" value="22"/>
        </form>
    </div>
</body>
</html>
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let transport = Rc::new(RecordingTransport::new());
    let mut page = Page::from_html(HTML, "https://example.com/site/", transport.clone());

    let id = page.activate(
        ContainerConfig::new()
            .with_id("c1")
            .data_type("html")
            .on_success(|body: &ResponseBody, status: TextStatus, _: &AjaxResponse| {
                println!("success ({}): {:?}", status.as_str(), body);
            })
            .on_complete(|response: &AjaxResponse, status: TextStatus| {
                println!("complete ({}): HTTP {}", status.as_str(), response.status);
            }),
    )?;
    println!("Activated #{}", id);

    for element in ["load", "plain"] {
        let node = page
            .document()
            .get_element_by_id(element)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", element))?;
        match page.click(node) {
            DefaultAction::Suppressed => println!("click #{}: intercepted", element),
            other => println!("click #{}: {:?}", element, other),
        }
    }

    let form = page
        .document()
        .get_element_by_id("form")
        .ok_or_else(|| anyhow::anyhow!("missing #form"))?;
    println!("submit #form: {:?}", page.submit(form));

    for (index, request) in transport.requests().iter().enumerate() {
        println!(
            "request {}: {} {:?} data={:?}",
            index,
            request.method_name(),
            request.url,
            request.data
        );
        transport.respond(index, Ok(AjaxResponse::new(200, "<p>partial</p>")));
    }

    page.deactivate(id.as_str());
    Ok(())
}
