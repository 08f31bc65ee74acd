use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{AppError, Result};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Longest description returned to the caller, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 350;

/// The product metadata a description is generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductBrief {
    pub name: String,
    pub price: f64,
    pub category_name: String,
    pub discount: Option<f64>,
    pub image_url: Option<String>,
}

/// Produces natural-language product copy.
#[automock]
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, brief: ProductBrief) -> Result<String>;
}

fn price_line(brief: &ProductBrief) -> String {
    match brief.discount.filter(|d| *d != 0.0) {
        Some(discount) => {
            let discounted = brief.price * (1.0 - discount / 100.0);
            format!("${} ({}% off, now ${:.2})", brief.price, discount, discounted)
        }
        None => format!("${}", brief.price),
    }
}

/// Builds the generation prompt for `brief`.
pub fn build_prompt(brief: &ProductBrief) -> String {
    let has_image = brief.image_url.is_some();

    let image_instruction = if has_image {
        "IMPORTANT: Analyze the product image carefully. Describe what you actually see: colors, materials, design, style, and specific visual details."
    } else {
        ""
    };
    let detail_rule = if has_image {
        "Reference specific visual details from the image"
    } else {
        "Be descriptive based on the product name and category"
    };

    format!(
        "Write a compelling e-commerce product description for this {category_lower} product.

Product: {name}
Category: {category}
Price: {price}

{image_instruction}

Requirements:
- Write 2-3 sentences (under {max} characters total)
- Be specific and concrete, not generic
- Focus on actual features and benefits
- Use natural, conversational language
- Make it sound authentic and trustworthy
- {detail_rule}
- Do NOT use phrases like \"command attention\", \"testament to\", \"elevate every moment\"; be more direct
- Do NOT use em dashes or regular dashes
- Do NOT include the price

Write a clear, specific description that helps customers understand what they're buying:",
        category_lower = brief.category_name.to_lowercase(),
        name = brief.name,
        category = brief.category_name,
        price = price_line(brief),
        max = MAX_DESCRIPTION_CHARS,
    )
}

/// Trims generated text and caps it at 350 characters, ellipsis included.
pub fn clamp_description(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_DESCRIPTION_CHARS {
        return trimmed.to_string();
    }

    let mut clamped: String = trimmed.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
    clamped.push_str("...");
    clamped
}

fn guess_mime(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else {
        "image/jpeg"
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    FileData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        #[serde(rename = "fileUri")]
        file_uri: String,
    },
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Generates descriptions with the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiDescriptionGenerator {
    client: reqwest::Client,
    api_key: Option<Zeroizing<String>>,
    model: String,
}

impl GeminiDescriptionGenerator {
    pub fn new(api_key: Option<Zeroizing<String>>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
        }
    }
}

#[async_trait]
impl DescriptionGenerator for GeminiDescriptionGenerator {
    async fn generate(&self, brief: ProductBrief) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Config("GOOGLE_API_KEY is not set".to_string()))?;

        let mut parts = vec![Part::Text(build_prompt(&brief))];
        if let Some(url) = &brief.image_url {
            parts.push(Part::FileData {
                mime_type: guess_mime(url).to_string(),
                file_uri: url.clone(),
            });
        }
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        tracing::debug!("🤖 Generating description for '{}' with {}", brief.name, self.model);

        let response = self
            .client
            .post(format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model))
            .header("x-goog-api-key", api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Description request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Description generator returned {}: {}",
                status, body
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid generator response: {}", e)))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::Upstream(
                "Description generator returned no text".to_string(),
            ));
        }

        Ok(clamp_description(&text))
    }
}
