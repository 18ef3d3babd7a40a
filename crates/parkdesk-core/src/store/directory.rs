use std::collections::HashMap;

use crate::config::GroupRoutes;
use crate::models::{ConversationKind, GroupInfo, LocalActor};

/// The conversations visible to the local actor.
///
/// A customer sees exactly their own support thread. A staff actor sees the
/// customers assigned to official support (supplied externally and
/// refreshable at runtime) plus the group channels their role routes to.
/// The directory only names conversations; the stores themselves are
/// created lazily elsewhere.
#[derive(Debug)]
pub struct ConversationDirectory {
    own_thread: Option<String>,
    assigned_customers: Vec<String>,
    group_ids: Vec<String>,
    group_info: HashMap<String, GroupInfo>,
}

impl ConversationDirectory {
    pub fn for_actor(actor: &LocalActor, routes: &GroupRoutes) -> Self {
        match actor {
            LocalActor::Customer { id } => Self {
                own_thread: Some(id.clone()),
                assigned_customers: Vec::new(),
                group_ids: Vec::new(),
                group_info: HashMap::new(),
            },
            LocalActor::Staff { role, .. } => Self {
                own_thread: None,
                assigned_customers: Vec::new(),
                group_ids: routes.groups_for(*role),
                group_info: HashMap::new(),
            },
        }
    }

    /// Replace the assigned-customer list (staff consoles refresh this from
    /// the membership lookup). Order is preserved, duplicates collapse.
    /// Ignored for customer actors, whose directory never grows.
    pub fn set_assigned_customers(&mut self, customers: Vec<String>) {
        if self.own_thread.is_some() {
            tracing::warn!("customer directories have a fixed single thread; ignoring assignment");
            return;
        }
        let mut seen = std::collections::HashSet::new();
        self.assigned_customers = customers
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect();
    }

    pub fn set_group_info(&mut self, group_id: impl Into<String>, info: GroupInfo) {
        self.group_info.insert(group_id.into(), info);
    }

    pub fn group_info(&self, group_id: &str) -> Option<&GroupInfo> {
        self.group_info.get(group_id)
    }

    /// Conversation ids in presentation order: direct threads first, then
    /// group channels.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.own_thread
            .iter()
            .chain(self.assigned_customers.iter())
            .chain(self.group_ids.iter())
            .map(String::as_str)
    }

    pub fn contains(&self, conversation_id: &str) -> bool {
        self.ids().any(|id| id == conversation_id)
    }

    /// Direct-thread ids only (broadcast fan-out targets).
    pub fn customer_ids(&self) -> impl Iterator<Item = &str> {
        self.own_thread
            .iter()
            .chain(self.assigned_customers.iter())
            .map(String::as_str)
    }

    pub fn kind_of(&self, conversation_id: &str) -> ConversationKind {
        if self.group_ids.iter().any(|g| g == conversation_id) {
            ConversationKind::Group
        } else {
            ConversationKind::Direct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STAFF_WIDE_GROUP;
    use crate::models::StaffRole;

    #[test]
    fn customer_directory_is_their_own_thread() {
        let actor = LocalActor::customer("CUST-12");
        let mut dir = ConversationDirectory::for_actor(&actor, &GroupRoutes::default());

        assert_eq!(dir.ids().collect::<Vec<_>>(), vec!["CUST-12"]);

        // Assignments are a staff concern.
        dir.set_assigned_customers(vec!["CUST-99".into()]);
        assert_eq!(dir.ids().collect::<Vec<_>>(), vec!["CUST-12"]);
    }

    #[test]
    fn staff_directory_combines_customers_and_role_groups() {
        let actor = LocalActor::staff("CSS-4", StaffRole::CustomerService);
        let mut dir = ConversationDirectory::for_actor(&actor, &GroupRoutes::default());
        dir.set_assigned_customers(vec!["CUST-1".into(), "CUST-2".into(), "CUST-1".into()]);

        let ids: Vec<_> = dir.ids().collect();
        assert_eq!(
            ids,
            vec!["CUST-1", "CUST-2", "GRP-customer-service", STAFF_WIDE_GROUP]
        );
        assert!(dir.contains("CUST-2"));
        assert!(!dir.contains("CUST-7"));
    }

    #[test]
    fn kind_follows_the_group_table() {
        let actor = LocalActor::staff("RMG-1", StaffRole::RideManager);
        let mut dir = ConversationDirectory::for_actor(&actor, &GroupRoutes::default());
        dir.set_assigned_customers(vec!["CUST-5".into()]);

        assert_eq!(dir.kind_of("GRP-rides"), ConversationKind::Group);
        assert_eq!(dir.kind_of("CUST-5"), ConversationKind::Direct);
        // Unknown ids default to direct threads.
        assert_eq!(dir.kind_of("CUST-404"), ConversationKind::Direct);
    }

    #[test]
    fn refreshing_assignments_replaces_the_list() {
        let actor = LocalActor::staff("CSS-4", StaffRole::CustomerService);
        let mut dir = ConversationDirectory::for_actor(&actor, &GroupRoutes::default());
        dir.set_assigned_customers(vec!["CUST-1".into()]);
        dir.set_assigned_customers(vec!["CUST-2".into(), "CUST-3".into()]);

        let customers: Vec<_> = dir.customer_ids().collect();
        assert_eq!(customers, vec!["CUST-2", "CUST-3"]);
    }

    #[test]
    fn group_metadata_round_trips() {
        let actor = LocalActor::staff("RMG-1", StaffRole::RideManager);
        let mut dir = ConversationDirectory::for_actor(&actor, &GroupRoutes::default());
        dir.set_group_info(
            "GRP-rides",
            GroupInfo {
                name: "Ride Operations".into(),
                members: vec!["RMG-1".into(), "RST-9".into()],
            },
        );

        assert_eq!(dir.group_info("GRP-rides").unwrap().name, "Ride Operations");
        assert!(dir.group_info("GRP-retail").is_none());
    }
}
