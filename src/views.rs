use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const PUB_COMPLETE_TEMPLATE: &str = include_str!("../templates/pub_complete.html");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// Page rendered at the end of a publish request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    PubComplete,
    Error,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::PubComplete => "pub_complete",
            View::Error => "error",
        }
    }

    fn status(self) -> StatusCode {
        match self {
            View::PubComplete => StatusCode::OK,
            View::Error => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn template(self) -> &'static str {
        match self {
            View::PubComplete => PUB_COMPLETE_TEMPLATE,
            View::Error => ERROR_TEMPLATE,
        }
    }

    /// Renders the page with `Topic` and `message` as its context.
    pub fn render(self, topic: &str, message: &str) -> Response {
        // escape_html encodes `{`, so a value can never introduce a slot
        let body = self
            .template()
            .replace("{{Topic}}", &escape_html(topic))
            .replace("{{message}}", &escape_html(message));

        (self.status(), [("x-view", self.name())], Html(body)).into_response()
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            _ => out.push(c),
        }
    }
    out
}
