use std::collections::HashMap;

use anyhow::Context;

use crate::constants::STAFF_WIDE_GROUP;
use crate::models::{LocalActor, StaffRole};

/// Role → group-id routing table.
///
/// Which channels a staff role participates in is data, not code: the table
/// is built here and consumed by the directory, so routing can change
/// without touching the reconciliation core. Every staff role additionally
/// belongs to the staff-wide channel.
#[derive(Debug, Clone)]
pub struct GroupRoutes {
    routes: HashMap<StaffRole, Vec<String>>,
    staff_wide: String,
}

impl GroupRoutes {
    pub fn new(staff_wide: impl Into<String>) -> Self {
        Self {
            routes: HashMap::new(),
            staff_wide: staff_wide.into(),
        }
    }

    pub fn add(&mut self, role: StaffRole, group_id: impl Into<String>) {
        self.routes.entry(role).or_default().push(group_id.into());
    }

    /// All group ids for `role`: its department channels plus the
    /// staff-wide channel, in that order.
    pub fn groups_for(&self, role: StaffRole) -> Vec<String> {
        let mut groups = self.routes.get(&role).cloned().unwrap_or_default();
        groups.push(self.staff_wide.clone());
        groups
    }

    pub fn staff_wide(&self) -> &str {
        &self.staff_wide
    }
}

impl Default for GroupRoutes {
    /// The venue's department channels.
    fn default() -> Self {
        use StaffRole::*;

        let mut routes = Self::new(STAFF_WIDE_GROUP);
        for role in [CustomerService] {
            routes.add(role, "GRP-customer-service");
        }
        for role in [FnbSupervisor, Chef, Waiter] {
            routes.add(role, "GRP-food-and-beverage");
        }
        for role in [RideManager, RideStaff] {
            routes.add(role, "GRP-rides");
        }
        for role in [MaintenanceManager, MaintenanceStaff] {
            routes.add(role, "GRP-maintenance");
        }
        for role in [RetailManager, SalesAssociate] {
            routes.add(role, "GRP-retail");
        }
        for role in [LostAndFound] {
            routes.add(role, "GRP-lost-and-found");
        }
        for role in [Executive] {
            routes.add(role, "GRP-executives");
        }
        routes
    }
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Identity operating this process.
    pub actor: LocalActor,
    pub group_routes: GroupRoutes,
}

impl CoreConfig {
    pub fn new(actor: LocalActor) -> Self {
        Self {
            actor,
            group_routes: GroupRoutes::default(),
        }
    }

    /// Build from the environment: `PARKDESK_ACTOR_ID` names the identity,
    /// `PARKDESK_ACTOR_ROLE` (a role slug such as `ride-manager`) makes it
    /// a staff session; without a role the session is a customer's.
    pub fn from_env() -> anyhow::Result<Self> {
        let id =
            std::env::var("PARKDESK_ACTOR_ID").context("PARKDESK_ACTOR_ID is not set")?;
        let actor = match std::env::var("PARKDESK_ACTOR_ROLE") {
            Ok(slug) => {
                let role = slug
                    .parse()
                    .with_context(|| format!("PARKDESK_ACTOR_ROLE {slug:?} is not a known role"))?;
                LocalActor::staff(id, role)
            }
            Err(_) => LocalActor::customer(id),
        };
        Ok(Self::new(actor))
    }
}
