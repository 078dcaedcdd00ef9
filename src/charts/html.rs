//! Embeddable HTML rendering of a figure.

use super::figure::Figure;
use crate::id::element_id;

/// plotly.js bundle referenced by rendered fragments.
pub const PLOTLY_JS_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Render `figure` as an HTML fragment (no `<html>`/`<body>`).
///
/// The fragment loads plotly.js from the CDN and draws into a `<div>` with a
/// fresh id, so several fragments can live on one page.
pub fn to_html_fragment(figure: &Figure) -> Result<String, serde_json::Error> {
    let id = element_id();
    let data = script_safe(serde_json::to_string(&figure.data)?);
    let layout = script_safe(serde_json::to_string(&figure.layout)?);

    Ok(format!(
        r#"<div>
    <script charset="utf-8" src="{PLOTLY_JS_CDN}"></script>
    <div id="{id}" class="plotly-graph-div" style="height:100%; width:100%;"></div>
    <script type="text/javascript">
        window.PLOTLYENV = window.PLOTLYENV || {{}};
        if (document.getElementById("{id}")) {{
            Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});
        }}
    </script>
</div>"#
    ))
}

// A "</script>" inside a string literal would end the inline script early.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_safe_escapes_closing_tags() {
        assert_eq!(
            script_safe(r#"{"name":"</script>"}"#.to_string()),
            r#"{"name":"<\/script>"}"#
        );
    }
}
