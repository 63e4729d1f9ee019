use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Categories offered by convention. Any non-empty category text is accepted.
pub const DEFAULT_CATEGORIES: &[&str] = &["Home", "Shopping", "Work", "Fitness", "Other"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "task", default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Keys this crate does not model, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }

        Ok(Self {
            text: text.to_string(),
            completed: false,
            extra: Map::new(),
        })
    }

    pub fn update_text(&mut self, new_text: &str) -> Result<(), ValidationError> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        self.text = new_text.to_string();
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TodoList {
    #[serde(rename = "list_name", default = "default_list_name")]
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TodoList {
    pub fn new(name: &str, category: &str, description: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyListName);
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Self {
            name: name.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            tasks: Vec::new(),
            extra: Map::new(),
        })
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

fn default_list_name() -> String {
    "List".to_string()
}

fn default_category() -> String {
    "Other".to_string()
}

// Older documents carry `"description": null` when the field was left blank.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The whole backing document. It must be a JSON object; a missing
/// `todo-lists` key means no lists.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(try_from = "Map<String, Value>")]
pub struct TodoDocument {
    #[serde(rename = "todo-lists")]
    pub todo_lists: Vec<TodoList>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TodoDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TryFrom<Map<String, Value>> for TodoDocument {
    type Error = serde_json::Error;

    fn try_from(mut extra: Map<String, Value>) -> Result<Self, Self::Error> {
        let todo_lists = match extra.remove("todo-lists") {
            Some(lists) => serde_json::from_value(lists)?,
            None => Vec::new(),
        };
        Ok(Self { todo_lists, extra })
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    #[error("List name cannot be empty")]
    EmptyListName,
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("Task text cannot be empty")]
    EmptyTaskText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new_trims_and_rejects_blank() {
        let task = Task::new("  Milk \n").unwrap();
        assert_eq!(task.text, "Milk");
        assert!(!task.completed);

        assert_eq!(Task::new("   ").unwrap_err(), ValidationError::EmptyTaskText);
        assert_eq!(Task::new("").unwrap_err(), ValidationError::EmptyTaskText);
    }

    #[test]
    fn test_list_new_requires_name_and_category() {
        assert_eq!(
            TodoList::new("", "Work", "").unwrap_err(),
            ValidationError::EmptyListName
        );
        assert_eq!(
            TodoList::new("Chores", "", "").unwrap_err(),
            ValidationError::EmptyCategory
        );

        let list = TodoList::new("Chores", "Home", "weekly").unwrap();
        assert_eq!(list.name, "Chores");
        assert_eq!(list.category, "Home");
        assert_eq!(list.description, "weekly");
        assert!(list.tasks.is_empty());
    }

    #[test]
    fn test_document_field_names() {
        let mut list = TodoList::new("Groceries", "Shopping", "").unwrap();
        list.tasks.push(Task::new("Milk").unwrap());
        let document = TodoDocument {
            todo_lists: vec![list],
            ..Default::default()
        };

        let value = serde_json::to_value(&document).unwrap();
        let list = &value["todo-lists"][0];
        assert_eq!(list["list_name"], "Groceries");
        assert_eq!(list["category"], "Shopping");
        assert_eq!(list["description"], "");
        assert_eq!(list["tasks"][0]["task"], "Milk");
        assert_eq!(list["tasks"][0]["completed"], false);
    }

    #[test]
    fn test_document_tolerant_decoding() {
        let document: TodoDocument = serde_json::from_str(
            r#"{"todo-lists": [
                {"list_name": "Gym", "description": null, "tasks": [{"task": "Run"}]},
                {}
            ]}"#,
        )
        .unwrap();

        assert_eq!(document.todo_lists.len(), 2);
        let gym = &document.todo_lists[0];
        assert_eq!(gym.category, "Other");
        assert_eq!(gym.description, "");
        assert!(!gym.tasks[0].completed);

        let blank = &document.todo_lists[1];
        assert_eq!(blank.name, "List");
        assert!(blank.tasks.is_empty());
    }

    #[test]
    fn test_document_without_lists_key_is_empty() {
        let document: TodoDocument = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(document.todo_lists.is_empty());
    }

    #[test]
    fn test_document_must_be_an_object() {
        let list = r#"{"list_name": "Gym", "category": "Fitness", "description": "", "tasks": []}"#;
        assert!(serde_json::from_str::<TodoDocument>(&format!("[[{}]]", list)).is_err());
        assert!(serde_json::from_str::<TodoDocument>("[]").is_err());
        assert!(serde_json::from_str::<TodoDocument>("\"todo-lists\"").is_err());
        assert!(serde_json::from_str::<TodoDocument>(r#"{"todo-lists": null}"#).is_err());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let input = r#"{
            "version": 2,
            "todo-lists": [{
                "list_name": "Gym",
                "category": "Fitness",
                "description": "",
                "color": "red",
                "tasks": [{"task": "Run", "completed": false, "due": "monday"}]
            }]
        }"#;
        let mut document: TodoDocument = serde_json::from_str(input).unwrap();
        assert_eq!(document.extra["version"], 2);
        assert_eq!(document.todo_lists[0].extra["color"], "red");
        assert_eq!(document.todo_lists[0].tasks[0].extra["due"], "monday");

        document.todo_lists[0].tasks.push(Task::new("Lift").unwrap());
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["version"], 2);
        let list = &value["todo-lists"][0];
        assert_eq!(list["color"], "red");
        assert_eq!(list["tasks"][0]["due"], "monday");
        assert_eq!(list["tasks"][1]["task"], "Lift");
        assert!(list["tasks"][1].get("due").is_none());
    }

    #[test]
    fn test_completed_count() {
        let mut list = TodoList::new("Groceries", "Shopping", "").unwrap();
        list.tasks.push(Task::new("Milk").unwrap());
        list.tasks.push(Task::new("Eggs").unwrap());
        list.tasks[1].completed = true;
        assert_eq!(list.completed_count(), 1);
    }
}
