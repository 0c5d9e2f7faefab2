use serde::{Deserialize, Serialize};
use url::Url;

use classroom_core::{DomainError, DomainResult, Entity, LessonId, ProductId};

/// A single lesson (video) belonging to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLesson")]
pub struct Lesson {
    id: LessonId,
    product_id: ProductId,
    name: String,
    video: Url,
}

#[derive(Deserialize)]
struct RawLesson {
    id: LessonId,
    product_id: ProductId,
    name: String,
    video: String,
}

impl TryFrom<RawLesson> for Lesson {
    type Error = DomainError;

    fn try_from(raw: RawLesson) -> Result<Self, Self::Error> {
        Lesson::new(raw.id, raw.product_id, raw.name, raw.video)
    }
}

impl Lesson {
    pub fn new(
        id: LessonId,
        product_id: ProductId,
        name: impl Into<String>,
        video: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let video = video.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("lesson name cannot be empty"));
        }
        let video = parse_video_url(&video)?;

        Ok(Self {
            id,
            product_id,
            name,
            video,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn video(&self) -> &Url {
        &self.video
    }
}

/// Absolute http(s) URL with a host.
fn parse_video_url(raw: &str) -> DomainResult<Url> {
    let invalid = || DomainError::validation(format!("lesson video must be an http(s) URL, got '{raw}'"));

    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(url)
}

impl Entity for Lesson {
    type Id = LessonId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
