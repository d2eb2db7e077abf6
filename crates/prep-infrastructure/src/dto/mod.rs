//! Data Transfer Objects (DTOs) for persistence.
//!
//! DTOs are the versioned on-disk schema. They convert to and from the domain
//! models in `prep-core` through version-migrate's `IntoDomain`/`FromDomain`.

mod session;

pub use session::{SessionStatusDTO, SessionV1_0_0, create_session_migrator};
