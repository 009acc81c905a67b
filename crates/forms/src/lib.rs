//! Schema-driven form engine.
//!
//! A server describes a record type as an ordered list of field definitions
//! (type tag, requiredness flags, a JSON blob of presentation hints). This
//! crate turns that description into everything a frontend needs to edit one
//! record, without depending on any particular UI toolkit:
//!
//! - [`field`]   : wire-level field definitions and the parsed [`SchemaField`]
//! - [`props`]   : typed UI properties, parsed once and leniently
//! - [`group`]   : section grouping and ordering
//! - [`control`] : field type → input control dispatch
//! - [`value`]   : typed in-memory values and stored-string coercions
//! - [`codec`]   : encode/decode between form values and the wire payload
//! - [`validate`]: required-field validation
//! - [`session`] : the create/edit form lifecycle state machine
//!
//! The pipeline never mutates the schema it was given and never fails on
//! malformed presentation metadata; bad hints degrade to defaults.

pub mod codec;
pub mod control;
pub mod field;
pub mod group;
pub mod props;
pub mod session;
pub mod validate;
pub mod value;

pub use codec::{decode, encode, WireValue};
pub use control::{control_spec, ControlKind, ControlSpec};
pub use field::{
    parse_schema, ColumnType, FieldDefinition, FieldValueDetail, SchemaField, SelectionDetails,
    SelectionOption,
};
pub use group::{group_fields, Section};
pub use props::UiProps;
pub use session::{FormMode, FormPhase, FormSession, SubmitOutcome};
pub use validate::{validate, RequiredMode, ValidationError};
pub use value::{FieldValue, WIRE_DATE_FORMAT};
