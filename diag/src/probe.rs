use colored::Colorize;
use gemini_core::client::GeminiClient;
use tracing::debug;

/// Models tried when none are given on the command line
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-1.5-flash-001",
    "gemini-1.5-flash-002",
    "gemini-1.5-flash-8b",
    "gemini-1.5-flash-8b-latest",
];

const REPLY_PREVIEW_CHARS: usize = 50;
const ERROR_PREVIEW_CHARS: usize = 100;

#[derive(Debug)]
pub struct ProbeReport {
    pub model: String,
    /// Reply preview on success, error summary on failure
    pub result: Result<String, String>,
}

impl ProbeReport {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn render(&self) -> String {
        match &self.result {
            Ok(preview) => format!(
                "{} {} is working! Response: {}...",
                "SUCCESS:".green().bold(),
                self.model,
                preview
            ),
            Err(summary) => format!("{} {}: {}", "ERROR for".red().bold(), self.model, summary),
        }
    }
}

/// Sends `prompt` to each model in order.
///
/// With `stop_at_first` the run ends at the first model that answers.
pub async fn probe_models(
    client: &GeminiClient,
    models: &[String],
    prompt: &str,
    stop_at_first: bool,
) -> Vec<ProbeReport> {
    let mut reports = Vec::new();

    for model in models {
        debug!(model = %model, "Probing model");
        let result = client
            .for_model(model)
            .generate_text(prompt, None)
            .await
            .map(|text| {
                text.unwrap_or_default()
                    .chars()
                    .take(REPLY_PREVIEW_CHARS)
                    .collect()
            })
            .map_err(|e| e.summary(ERROR_PREVIEW_CHARS));

        let report = ProbeReport {
            model: model.clone(),
            result,
        };
        let done = stop_at_first && report.succeeded();
        reports.push(report);
        if done {
            break;
        }
    }

    reports
}
