use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Matter {
    pub id: String,
    pub folder_name: String,
    pub subject_matter: String,
    pub description: String,
    pub jurisdiction: String,
    pub court_division: String,
    pub status: String,
    pub client_name: String,
    pub opened_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub document_number: String,
    pub company: String,
    pub phone: String,
    pub role: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.surname.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Calculator {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub description: String,
    pub folder_name: String,
    pub amount: Option<f64>,
    pub calculated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub kind: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
}
