use serde::{Deserialize, Serialize};

/// Body of `POST /api/v2/samples`
#[derive(Debug, Serialize)]
pub struct CreateSampleRequest<'a> {
    pub voice_id: &'a str,
    pub emotion: &'a str,
    pub name: &'a str,
    pub text: &'a str,
    pub speed: f64,
}

/// Response of `POST /api/v2/samples`
#[derive(Debug, Deserialize)]
pub struct SampleResponse {
    pub id: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub audio_url: String,
}

/// One page of `/api/v2/voices` or `/api/v2/speakers`
#[derive(Debug, Deserialize)]
pub struct ListVoicesResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub has_prev: bool,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub result: Vec<ListedVoice>,
}

#[derive(Debug, Deserialize)]
pub struct ListedVoice {
    pub id: String,
    pub name: String,
}
