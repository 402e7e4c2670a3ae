pub mod error;
pub mod spec;
pub mod state;
pub mod urgency;
pub mod utility;

pub use error::{SpecError, StrategyError};
pub use spec::{UrgencySpec, UtilitySpec};
pub use state::{NOVELTY_KEY, RISK_KEY, WorldState};
pub use urgency::{
    ConstantUrgency, GeometricDecay, LinearDecay, LinearRamp, UrgencyFn, UrgencyStrategy,
};
pub use utility::{ConstantUtility, InverseStateKey, StateKey, UtilityFn, UtilityStrategy};
