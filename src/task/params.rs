// ABOUTME: Task parameter model and declarative parameter binding
// ABOUTME: Extracts declared fields into parameter lists and reconstructs instances from them

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::runner::TaskRunner;

/// Scalar kinds supported for task parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Int,
    Str,
}

/// A typed scalar value carried by a task parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Str(String),
}

/// A single named parameter extracted from a task runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskParam {
    pub name: String,
    pub value: ParamValue,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("No parameter field named '{field}'")]
    UnknownField { field: String },

    #[error("Parameter field '{field}' is not assignable")]
    NotAssignable { field: String },

    #[error("Parameter field '{field}' expects {expected}, got {actual}")]
    KindMismatch {
        field: String,
        expected: ParamKind,
        actual: ParamKind,
    },
}

/// Declarative descriptor for one parameter field of a concrete runner type.
///
/// This replaces runtime field introspection: each runner type registers the
/// name, kind, getter, and setter of every field it exposes as a task
/// parameter. Non-capturing closures coerce to the `fn` pointers, so specs
/// can live in a `const` slice.
pub struct ParamSpec<T> {
    pub name: &'static str,
    pub kind: ParamKind,
    pub get: fn(&T) -> ParamValue,
    pub set: fn(&mut T, ParamValue) -> Result<(), BindError>,
}

/// Declares which fields of a runner type are task parameters.
///
/// The parameter binder is the only consumer of these descriptors.
pub trait Parameters: Sized {
    fn param_specs() -> &'static [ParamSpec<Self>];
}

/// Extract the declared parameter fields of `source` into an ordered list.
///
/// Descriptor getters are typed, so unlike a reflective implementation this
/// cannot encounter an unsupported field kind at extraction time.
pub fn extract<T: Parameters + 'static>(source: &T) -> Vec<TaskParam> {
    T::param_specs()
        .iter()
        .map(|spec| TaskParam {
            name: spec.name.to_string(),
            value: (spec.get)(source),
        })
        .collect()
}

/// Assign each entry in `params` to the matching declared field of `target`.
///
/// Fails with a `BindError` naming the field when the field is not declared
/// or the value kind does not match the declaration. Applying the same list
/// twice yields the same field values.
pub fn apply<T: Parameters + 'static>(target: &mut T, params: &[TaskParam]) -> Result<(), BindError> {
    let specs = T::param_specs();

    for param in params {
        let spec = specs
            .iter()
            .find(|spec| spec.name == param.name)
            .ok_or_else(|| BindError::UnknownField {
                field: param.name.clone(),
            })?;

        if spec.kind != param.value.kind() {
            return Err(BindError::KindMismatch {
                field: param.name.clone(),
                expected: spec.kind,
                actual: param.value.kind(),
            });
        }

        (spec.set)(target, param.value.clone())?;
    }

    Ok(())
}

/// Extract the declared parameters of `runner` and store them on its node.
///
/// Must be called before the tree is validated: the node's identity hash is
/// a pure function of its name and stored parameter list.
pub fn bind<T: Parameters + TaskRunner + 'static>(runner: &T) -> Vec<TaskParam> {
    let params = extract(runner);
    runner.node().set_params(params.clone());
    params
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Str(_) => ParamKind::Str,
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Int => write!(f, "int"),
            ParamKind::Str => write!(f, "str"),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Str(value) => write!(f, "{}", value),
        }
    }
}

impl std::fmt::Display for TaskParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}
