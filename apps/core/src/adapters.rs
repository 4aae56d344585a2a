use crate::entities::{CalendarEvent, Calculator, Contact, Matter, Task};
use crate::model::{normalize_for_search, EntityType, SearchResult};

pub struct AdapterDescriptor<T> {
    pub entity_type: EntityType,
    pub fields: fn(&T) -> Vec<&str>,
    pub project: fn(&T) -> SearchResult,
}

pub const MATTERS: AdapterDescriptor<Matter> = AdapterDescriptor {
    entity_type: EntityType::Matter,
    fields: matter_fields,
    project: project_matter,
};

pub const CONTACTS: AdapterDescriptor<Contact> = AdapterDescriptor {
    entity_type: EntityType::Contact,
    fields: contact_fields,
    project: project_contact,
};

pub const CALCULATORS: AdapterDescriptor<Calculator> = AdapterDescriptor {
    entity_type: EntityType::Calculator,
    fields: calculator_fields,
    project: project_calculator,
};

pub const TASKS: AdapterDescriptor<Task> = AdapterDescriptor {
    entity_type: EntityType::Task,
    fields: task_fields,
    project: project_task,
};

pub const EVENTS: AdapterDescriptor<CalendarEvent> = AdapterDescriptor {
    entity_type: EntityType::Event,
    fields: event_fields,
    project: project_event,
};

/// Substring search over one collection. Output keeps collection order.
pub fn search_collection<T>(
    descriptor: &AdapterDescriptor<T>,
    records: &[T],
    query: &str,
) -> Vec<SearchResult> {
    let normalized_query = normalize_for_search(query);
    if normalized_query.is_empty() || records.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| searchable_text(descriptor, record).contains(&normalized_query))
        .map(descriptor.project)
        .collect()
}

fn searchable_text<T>(descriptor: &AdapterDescriptor<T>, record: &T) -> String {
    let joined = (descriptor.fields)(record)
        .into_iter()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_for_search(&joined)
}

fn matter_fields(matter: &Matter) -> Vec<&str> {
    vec![
        matter.folder_name.as_str(),
        matter.subject_matter.as_str(),
        matter.description.as_str(),
        matter.jurisdiction.as_str(),
        matter.court_division.as_str(),
    ]
}

fn project_matter(matter: &Matter) -> SearchResult {
    let subtitle = [matter.subject_matter.trim(), matter.jurisdiction.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    let result = SearchResult::new(&matter.id, EntityType::Matter, &matter.folder_name)
        .with_subtitle(subtitle)
        .with_description(matter.description.clone());
    with_text_fields(
        result,
        &[
            ("status", &matter.status),
            ("jurisdiction", &matter.jurisdiction),
            ("courtDivision", &matter.court_division),
            ("clientName", &matter.client_name),
            ("openedAt", &matter.opened_at),
        ],
    )
}

fn contact_fields(contact: &Contact) -> Vec<&str> {
    vec![
        contact.name.as_str(),
        contact.surname.as_str(),
        contact.email.as_str(),
        contact.document_number.as_str(),
        contact.company.as_str(),
    ]
}

fn project_contact(contact: &Contact) -> SearchResult {
    let subtitle = if contact.company.trim().is_empty() {
        contact.email.clone()
    } else {
        contact.company.clone()
    };
    let result = SearchResult::new(&contact.id, EntityType::Contact, &contact.full_name())
        .with_subtitle(subtitle);
    with_text_fields(
        result,
        &[
            ("email", &contact.email),
            ("documentNumber", &contact.document_number),
            ("phone", &contact.phone),
            ("role", &contact.role),
        ],
    )
}

fn calculator_fields(calculator: &Calculator) -> Vec<&str> {
    vec![
        calculator.name.as_str(),
        calculator.kind.as_str(),
        calculator.description.as_str(),
        calculator.folder_name.as_str(),
    ]
}

fn project_calculator(calculator: &Calculator) -> SearchResult {
    let mut result = SearchResult::new(&calculator.id, EntityType::Calculator, &calculator.name)
        .with_subtitle(calculator.kind.clone())
        .with_description(calculator.description.clone());
    if let Some(amount) = calculator.amount {
        result = result.with_metadata("amount", amount);
    }
    with_text_fields(
        result,
        &[
            ("folderName", &calculator.folder_name),
            ("calculatedAt", &calculator.calculated_at),
        ],
    )
}

fn task_fields(task: &Task) -> Vec<&str> {
    vec![
        task.title.as_str(),
        task.description.as_str(),
        task.assignee.as_str(),
        task.status.as_str(),
    ]
}

fn project_task(task: &Task) -> SearchResult {
    let result = SearchResult::new(&task.id, EntityType::Task, &task.title)
        .with_subtitle(task.status.clone())
        .with_description(task.description.clone())
        .with_metadata("completed", task.completed);
    with_text_fields(
        result,
        &[
            ("status", &task.status),
            ("priority", &task.priority),
            ("assignee", &task.assignee),
            ("dueDate", &task.due_date),
        ],
    )
}

fn event_fields(event: &CalendarEvent) -> Vec<&str> {
    vec![
        event.title.as_str(),
        event.description.as_str(),
        event.location.as_str(),
        event.kind.as_str(),
    ]
}

fn project_event(event: &CalendarEvent) -> SearchResult {
    let result = SearchResult::new(&event.id, EntityType::Event, &event.title)
        .with_subtitle(event.start.clone())
        .with_description(event.description.clone())
        .with_metadata("allDay", event.all_day);
    with_text_fields(
        result,
        &[
            ("location", &event.location),
            ("kind", &event.kind),
            ("start", &event.start),
            ("end", &event.end),
        ],
    )
}

fn with_text_fields(mut result: SearchResult, fields: &[(&str, &String)]) -> SearchResult {
    for (key, value) in fields {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            result = result.with_metadata(key, trimmed);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetadataValue;

    #[test]
    fn matter_search_ignores_accents() {
        let matters = vec![Matter {
            id: "f1".into(),
            folder_name: "Pérez c/ Gómez".into(),
            ..Default::default()
        }];

        let results = search_collection(&MATTERS, &matters, "perez");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Pérez c/ Gómez");
        assert_eq!(results[0].entity_type, EntityType::Matter);
    }

    #[test]
    fn matter_search_reaches_court_division() {
        let matters = vec![
            Matter {
                id: "f1".into(),
                folder_name: "Sucesión Ruiz".into(),
                court_division: "Civil y Comercial".into(),
                ..Default::default()
            },
            Matter {
                id: "f2".into(),
                folder_name: "Despido Álvarez".into(),
                court_division: "Laboral".into(),
                ..Default::default()
            },
        ];

        let results = search_collection(&MATTERS, &matters, "laboral");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "f2");
    }

    #[test]
    fn results_keep_collection_order() {
        let contacts = vec![
            Contact {
                id: "c2".into(),
                name: "Lucía".into(),
                surname: "López".into(),
                ..Default::default()
            },
            Contact {
                id: "c1".into(),
                name: "Mario".into(),
                surname: "Lopez".into(),
                ..Default::default()
            },
        ];

        let results = search_collection(&CONTACTS, &contacts, "LOPEZ");

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1"]);
        assert_eq!(results[0].title, "Lucía López");
    }

    #[test]
    fn blank_query_returns_nothing() {
        let tasks = vec![Task {
            id: "t1".into(),
            title: "Presentar escrito".into(),
            ..Default::default()
        }];
        assert!(search_collection(&TASKS, &tasks, "   ").is_empty());
    }

    #[test]
    fn calculator_projection_carries_amount() {
        let calculators = vec![Calculator {
            id: "k1".into(),
            name: "Liquidación final".into(),
            kind: "Laboral".into(),
            amount: Some(1520.5),
            ..Default::default()
        }];

        let results = search_collection(&CALCULATORS, &calculators, "liquidacion");

        assert_eq!(
            results[0].metadata.get("amount"),
            Some(&MetadataValue::Number(1520.5))
        );
        assert_eq!(results[0].subtitle.as_deref(), Some("Laboral"));
    }

    #[test]
    fn event_search_matches_location() {
        let events = vec![CalendarEvent {
            id: "e1".into(),
            title: "Audiencia preliminar".into(),
            location: "Juzgado N° 4".into(),
            ..Default::default()
        }];

        let results = search_collection(&EVENTS, &events, "juzgado");

        assert_eq!(results.len(), 1);
        assert!(results[0].metadata.contains_key("location"));
        assert!(!results[0].metadata.contains_key("kind"));
    }
}
