use askdoc_llm::LlmProvider;
use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::server::AppState;

#[derive(serde::Deserialize)]
pub(crate) struct AskForm {
    pub question: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    index_entries: usize,
}

/// What the page shows below the form after a submission.
enum Outcome {
    None,
    Warning(&'static str),
    Error(String),
    Answer { text: String, sources: Vec<String> },
}

pub(crate) async fn form_page<P: LlmProvider>(
    State(_state): State<AppState<P>>,
) -> impl IntoResponse {
    Html(render_page("", &Outcome::None))
}

pub(crate) async fn ask_handler<P: LlmProvider>(
    State(state): State<AppState<P>>,
    axum::Form(form): axum::Form<AskForm>,
) -> impl IntoResponse {
    if form.question.trim().is_empty() {
        // Pipeline is not invoked for blank input.
        return Html(render_page(
            &form.question,
            &Outcome::Warning("Please enter a valid question."),
        ));
    }

    match state.engine.answer(form.question.trim()).await {
        Ok(answer) => Html(render_page(
            &form.question,
            &Outcome::Answer {
                text: answer.text,
                sources: answer.sources,
            },
        )),
        Err(e) => {
            tracing::warn!(error = %e, "question failed");
            Html(render_page(&form.question, &Outcome::Error(e.to_string())))
        }
    }
}

pub(crate) async fn health_handler<P: LlmProvider>(
    State(state): State<AppState<P>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        index_entries: state.engine.index_len(),
    })
}

fn render_page(question: &str, outcome: &Outcome) -> String {
    let mut body = String::from(
        "<!doctype html>\n<html>\n<head><title>askdoc</title></head>\n<body>\n\
         <h1>Document Assistant</h1>\n\
         <p>Ask any question about the configured document.</p>\n\
         <form method=\"post\" action=\"/ask\">\n\
         <input type=\"text\" name=\"question\" value=\"",
    );
    body.push_str(&escape_html(question));
    body.push_str(
        "\" size=\"60\">\n<button type=\"submit\">Submit</button>\n</form>\n",
    );

    match outcome {
        Outcome::None => {}
        Outcome::Warning(msg) => {
            body.push_str("<p class=\"warning\">");
            body.push_str(msg);
            body.push_str("</p>\n");
        }
        Outcome::Error(msg) => {
            body.push_str("<p class=\"error\">An error occurred: ");
            body.push_str(&escape_html(msg));
            body.push_str("</p>\n");
        }
        Outcome::Answer { text, sources } => {
            body.push_str("<h2>Answer</h2>\n<p>");
            body.push_str(&escape_html(text));
            body.push_str("</p>\n<h2>Sources</h2>\n<ul>\n");
            for source in sources {
                body.push_str("<li>");
                body.push_str(&escape_html(source));
                body.push_str("</li>\n");
            }
            body.push_str("</ul>\n");
        }
    }

    body.push_str("</body>\n</html>\n");
    body
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
