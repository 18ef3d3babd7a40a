/// Staff departments the venue staffs its consoles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffRole {
    CustomerService,
    Executive,
    FnbSupervisor,
    Chef,
    Waiter,
    RideManager,
    RideStaff,
    MaintenanceManager,
    MaintenanceStaff,
    RetailManager,
    SalesAssociate,
    LostAndFound,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown staff role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for StaffRole {
    type Err = UnknownRole;

    /// Role slugs as the console's route paths spell them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "customer-service" => Self::CustomerService,
            "executives" => Self::Executive,
            "fnb-supervisor" => Self::FnbSupervisor,
            "chef" => Self::Chef,
            "waiter" => Self::Waiter,
            "ride-manager" => Self::RideManager,
            "ride-staff" => Self::RideStaff,
            "maintenance-manager" => Self::MaintenanceManager,
            "maintenance-staff" => Self::MaintenanceStaff,
            "retail-manager" => Self::RetailManager,
            "sales-associate" => Self::SalesAssociate,
            "lost-and-found" => Self::LostAndFound,
            other => return Err(UnknownRole(other.to_string())),
        })
    }
}

/// The identity operating the current screen.
///
/// Decides message direction, unread attribution, and which conversations
/// the directory exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalActor {
    Customer { id: String },
    Staff { id: String, role: StaffRole },
}

impl LocalActor {
    pub fn customer(id: impl Into<String>) -> Self {
        Self::Customer { id: id.into() }
    }

    pub fn staff(id: impl Into<String>, role: StaffRole) -> Self {
        Self::Staff { id: id.into(), role }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Customer { id } | Self::Staff { id, .. } => id,
        }
    }

    pub fn role(&self) -> Option<StaffRole> {
        match self {
            Self::Customer { .. } => None,
            Self::Staff { role, .. } => Some(*role),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_slugs_parse() {
        assert_eq!("ride-manager".parse(), Ok(StaffRole::RideManager));
        assert_eq!("fnb-supervisor".parse(), Ok(StaffRole::FnbSupervisor));
        assert_eq!(
            "janitor".parse::<StaffRole>(),
            Err(UnknownRole("janitor".into()))
        );
    }

    #[test]
    fn actor_accessors() {
        let customer = LocalActor::customer("CUST-41");
        assert_eq!(customer.id(), "CUST-41");
        assert!(!customer.is_staff());
        assert_eq!(customer.role(), None);

        let staff = LocalActor::staff("CSS-9", StaffRole::CustomerService);
        assert_eq!(staff.id(), "CSS-9");
        assert!(staff.is_staff());
        assert_eq!(staff.role(), Some(StaffRole::CustomerService));
    }
}
