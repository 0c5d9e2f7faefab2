use serde::{Deserialize, Serialize};

use classroom_core::{AuthorId, DomainError, DomainResult, Entity, StudentId};

/// Full name of a person (author or student).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPersonName")]
pub struct PersonName {
    name: String,
    surname: String,
    patronymic: Option<String>,
}

#[derive(Deserialize)]
struct RawPersonName {
    name: String,
    surname: String,
    #[serde(default)]
    patronymic: Option<String>,
}

impl TryFrom<RawPersonName> for PersonName {
    type Error = DomainError;

    fn try_from(raw: RawPersonName) -> Result<Self, Self::Error> {
        PersonName::new(raw.name, raw.surname, raw.patronymic)
    }
}

impl PersonName {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        patronymic: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let surname = surname.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if surname.trim().is_empty() {
            return Err(DomainError::validation("surname cannot be empty"));
        }

        // A blank patronymic is the same as none.
        let patronymic = patronymic.filter(|p| !p.trim().is_empty());

        Ok(Self {
            name,
            surname,
            patronymic,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn patronymic(&self) -> Option<&str> {
        self.patronymic.as_deref()
    }
}

impl core::fmt::Display for PersonName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.surname, self.name)
    }
}

/// Author of one or more products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    #[serde(flatten)]
    pub name: PersonName,
}

impl Author {
    pub fn new(id: AuthorId, name: PersonName) -> Self {
        Self { id, name }
    }
}

impl Entity for Author {
    type Id = AuthorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Author {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.name, f)
    }
}

/// Student who can be granted access to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub name: PersonName,
}

impl Student {
    pub fn new(id: StudentId, name: PersonName) -> Self {
        Self { id, name }
    }
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Student {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.name, f)
    }
}
