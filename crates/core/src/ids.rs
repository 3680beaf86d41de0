use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a stored identifier value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying identifier value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Organization identifier; the organization is the top-level tenant.
    OrganizationId
);
entity_id!(
    /// Department identifier, unique across organizations.
    DepartmentId
);
entity_id!(
    /// User (actor) identifier.
    UserId
);
entity_id!(
    /// Ticket identifier.
    TicketId
);
entity_id!(
    /// Customer company identifier referenced by tickets and hour banks.
    CompanyId
);
entity_id!(
    /// Hour bank identifier.
    HourBankId
);
entity_id!(
    /// Hour bank request identifier.
    HourBankRequestId
);
entity_id!(
    /// RBAC role identifier.
    RoleId
);
