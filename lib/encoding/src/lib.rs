pub mod encoder;
pub mod layout;
pub mod state;
pub mod vectorizer;

pub use encoder::{effective_labels, AttributeEncoder, AttributeKind};
pub use layout::{FeatureLayout, LayoutEntry};
pub use state::DerivedState;
pub use vectorizer::{default_attributes, AttributeSpec, ProfileVectorizer};
