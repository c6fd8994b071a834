pub mod praktikum;
pub mod status;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::PollError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Homework {
    pub homework_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub homeworks: Vec<Homework>,
    pub current_date: Option<i64>,
}

impl StatusResponse {
    /// The API lists the most recent submission first.
    pub fn latest(&self) -> Option<&Homework> {
        self.homeworks.first()
    }
}

#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<StatusResponse, PollError>;
}
