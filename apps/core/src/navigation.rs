use crate::model::{EntityType, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub entity_type: EntityType,
    pub id: String,
    pub route: String,
}

impl NavigationTarget {
    pub fn for_result(result: &SearchResult) -> Self {
        Self {
            entity_type: result.entity_type,
            id: result.id.clone(),
            route: route_for(result.entity_type, &result.id),
        }
    }
}

pub fn route_for(entity_type: EntityType, id: &str) -> String {
    let id = urlencoding::encode(id);
    match entity_type {
        EntityType::Matter => format!("/folders/{id}"),
        EntityType::Contact => format!("/contacts?contactId={id}"),
        EntityType::Calculator => format!("/calculators/{id}"),
        EntityType::Task => format!("/tasks?taskId={id}"),
        EntityType::Event => format!("/calendar?eventId={id}"),
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &NavigationTarget);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_route() {
        assert_eq!(route_for(EntityType::Matter, "f1"), "/folders/f1");
        assert_eq!(route_for(EntityType::Contact, "c1"), "/contacts?contactId=c1");
        assert_eq!(route_for(EntityType::Calculator, "k1"), "/calculators/k1");
        assert_eq!(route_for(EntityType::Task, "t1"), "/tasks?taskId=t1");
        assert_eq!(route_for(EntityType::Event, "e1"), "/calendar?eventId=e1");
    }

    #[test]
    fn ids_are_escaped() {
        assert_eq!(route_for(EntityType::Matter, "a/b c"), "/folders/a%2Fb%20c");
        assert_eq!(
            route_for(EntityType::Contact, "Pérez&1"),
            "/contacts?contactId=P%C3%A9rez%261"
        );
    }

    #[test]
    fn target_copies_identity_from_result() {
        let result = SearchResult::new("t9", EntityType::Task, "Apelar");
        let target = NavigationTarget::for_result(&result);
        assert_eq!(target.id, "t9");
        assert_eq!(target.route, "/tasks?taskId=t9");
    }
}
