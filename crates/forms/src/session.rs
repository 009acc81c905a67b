//! Form lifecycle state machine.
//!
//! One generic session drives both the create and the edit flow; the two
//! differ only in how initial values arrive (declared defaults vs. a fetched
//! record) and which requiredness flag validation reads. The session owns
//! the schema and the typed value map, enforces the single-in-flight
//! submission rule, and tags itself with a generation so responses that
//! arrive after the session was replaced can be recognized and dropped.
//!
//! The session performs no I/O. Callers fetch the schema or record, feed the
//! result in through [`FormSession::schema_loaded`] /
//! [`FormSession::record_loaded`], and act on the value returned by
//! [`FormSession::submit`].

use std::collections::BTreeMap;

use crate::codec::{decode, encode, WireValue};
use crate::field::{parse_schema, FieldDefinition, FieldValueDetail, SchemaField};
use crate::group::{group_fields, Section};
use crate::validate::{validate, RequiredMode, ValidationError};
use crate::value::FieldValue;

/// Create a new record, or edit an existing one by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { object_uuid: String },
}

/// Lifecycle of a form session.
///
/// The form only becomes interactive in `Ready`; there is no rendering
/// against a partially loaded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Waiting for the schema (create) or the record detail (edit).
    Loading,
    /// Interactive; values may change and submission may be attempted.
    Ready,
    /// A persistence call is in flight. Further submits are ignored.
    Submitting,
    /// Persistence succeeded; the session is finished.
    Done,
}

/// Result of a submission attempt from `Ready`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the session stays `Ready` and keeps the errors.
    Rejected(Vec<ValidationError>),
    /// Validation passed; the session moved to `Submitting` and this is the
    /// payload for the persistence call.
    Payload(Vec<WireValue>),
}

/// State of one create-or-edit form.
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: FormMode,
    phase: FormPhase,
    generation: u64,
    schema: Vec<SchemaField>,
    sections: Vec<Section>,
    values: BTreeMap<String, FieldValue>,
    errors: Vec<ValidationError>,
}

impl FormSession {
    pub fn create(generation: u64) -> Self {
        Self::new(FormMode::Create, generation)
    }

    pub fn edit(object_uuid: impl Into<String>, generation: u64) -> Self {
        Self::new(
            FormMode::Edit {
                object_uuid: object_uuid.into(),
            },
            generation,
        )
    }

    fn new(mode: FormMode, generation: u64) -> Self {
        Self {
            mode,
            phase: FormPhase::Loading,
            generation,
            schema: Vec::new(),
            sections: Vec::new(),
            values: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when a response tagged with `generation` belongs to a session
    /// that has since been replaced.
    pub fn is_stale(&self, generation: u64) -> bool {
        generation != self.generation
    }

    pub fn required_mode(&self) -> RequiredMode {
        match self.mode {
            FormMode::Create => RequiredMode::Create,
            FormMode::Edit { .. } => RequiredMode::Edit,
        }
    }

    pub fn schema(&self) -> &[SchemaField] {
        &self.schema
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn error_for(&self, data_index: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.data_index == data_index)
    }

    /// Install the creation schema and populate declared initial values.
    /// Moves `Loading → Ready`; ignored in any other phase.
    pub fn schema_loaded(&mut self, fields: Vec<FieldDefinition>) {
        if self.phase != FormPhase::Loading {
            return;
        }
        self.schema = parse_schema(fields);
        for field in &self.schema {
            if let Some(text) = field.props.initial_value_text() {
                self.values.insert(
                    field.data_index().to_string(),
                    FieldValue::from_stored(field.column_type(), &text),
                );
            }
        }
        self.sections = group_fields(&self.schema);
        self.phase = FormPhase::Ready;
    }

    /// Install an edit session's schema and current values from the fetched
    /// record detail. Moves `Loading → Ready`; ignored in any other phase.
    pub fn record_loaded(&mut self, details: Vec<FieldValueDetail>) {
        if self.phase != FormPhase::Loading {
            return;
        }
        self.values = decode(&details);
        self.schema = parse_schema(
            details
                .into_iter()
                .map(|d| d.into_parts().0)
                .collect(),
        );
        self.sections = group_fields(&self.schema);
        self.phase = FormPhase::Ready;
    }

    pub fn value(&self, data_index: &str) -> Option<&FieldValue> {
        self.values.get(data_index)
    }

    /// Set a field's value. Only honored while `Ready`; clears a pending
    /// validation error for that field.
    pub fn set_value(&mut self, data_index: &str, value: FieldValue) {
        if self.phase != FormPhase::Ready {
            return;
        }
        self.values.insert(data_index.to_string(), value);
        self.errors.retain(|e| e.data_index != data_index);
    }

    /// Attempt submission.
    ///
    /// Returns `None` unless the session is `Ready`, in particular while a
    /// previous submission is still in flight. On validation failure the
    /// session stays `Ready` with all violations recorded; on success it
    /// moves to `Submitting` and hands back the encoded payload.
    pub fn submit(&mut self) -> Option<SubmitOutcome> {
        if self.phase != FormPhase::Ready {
            return None;
        }
        let errors = validate(&self.values, &self.schema, self.required_mode());
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Some(SubmitOutcome::Rejected(errors));
        }
        self.errors.clear();
        self.phase = FormPhase::Submitting;
        Some(SubmitOutcome::Payload(encode(&self.values, &self.schema)))
    }

    /// The persistence call succeeded; the session is finished.
    pub fn submit_succeeded(&mut self) {
        if self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Done;
        }
    }

    /// The persistence call failed; the form returns to `Ready` with all
    /// entered values intact so the user can retry.
    pub fn submit_failed(&mut self) {
        if self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Ready;
        }
    }
}
