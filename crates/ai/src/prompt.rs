//! Chat prompts for classification and recommendation requests.

use serde::{Deserialize, Serialize};

use stockcast_core::{Category, Forecast, SalesHistory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion request body (deployment is addressed by URL).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

/// Classification: answer with a single category name.
pub fn classification_request(history: &SalesHistory) -> ChatRequest {
    let user = format!(
        "Analyze the following material data and classify it into one of the following categories:\n\
         - Fast-Moving\n\
         - Slow-Moving\n\
         - Seasonal\n\
         **Sales Data (Monthly):** {}\n\
         Provide ONLY the category name in response. No explanations.",
        format_sales(history)
    );

    ChatRequest {
        messages: vec![
            ChatMessage::system(
                "You are an AI assistant specializing in inventory classification and demand forecasting.",
            ),
            ChatMessage::user(user),
        ],
        max_tokens: 5,
        temperature: 0.3,
        top_p: Some(0.9),
    }
}

/// Recommendation: answer with the inventory action only.
pub fn recommendation_request(forecast: &Forecast, category: &Category) -> ChatRequest {
    let user = format!(
        "- **Forecasted Sales for Next 6 Months:** {forecast}\n\
         - **Material Classification:** {category}\n\
         Recommend the most suitable inventory action for the next 6 months. \
         Provide only the recommended action, without explanations."
    );

    ChatRequest {
        messages: vec![
            ChatMessage::system("You are an AI assistant specializing in inventory decision-making."),
            ChatMessage::user(user),
        ],
        max_tokens: 10,
        temperature: 0.3,
        top_p: None,
    }
}

/// `[12, 15.5, 0]`: whole numbers without a fractional part.
fn format_sales(history: &SalesHistory) -> String {
    let items: Vec<String> = history
        .values()
        .iter()
        .map(|v| {
            if v.fract() == 0.0 {
                format!("{v:.0}")
            } else {
                v.to_string()
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}
