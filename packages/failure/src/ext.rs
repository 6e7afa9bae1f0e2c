//! Extension traits turning `Result` and `Option` into stacks

use crate::build::assemble;
use crate::config::Config;
use crate::error::BoxError;
use crate::field::{Code, ErrorCode, FieldGroup};
use crate::stack::{Stack, Underlying};

/// Attach fields to the error of a `Result`.
///
/// The recorded call site is the caller of these methods.
pub trait ResultExt<T> {
    /// [`wrap`](crate::wrap) the error
    fn wrap_err(self, fields: FieldGroup) -> Result<T, Stack>;

    /// Like [`wrap_err`](Self::wrap_err), building the fields only on error
    fn wrap_err_with<F>(self, fields: F) -> Result<T, Stack>
    where
        F: FnOnce() -> FieldGroup;

    /// [`translate`](crate::translate) the error to `code`
    fn translate_err<C: ErrorCode>(self, code: C, fields: FieldGroup) -> Result<T, Stack>;

    /// Hide the error behind an [`opaque`](crate::opaque) stack
    fn opaque_err(self, fields: FieldGroup) -> Result<T, Stack>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[inline(never)]
    #[track_caller]
    fn wrap_err(self, fields: FieldGroup) -> Result<T, Stack> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(assemble(
                &Config::DEFAULT,
                Underlying::Transparent(e.into()),
                None,
                fields,
                1,
            )),
        }
    }

    #[inline(never)]
    #[track_caller]
    fn wrap_err_with<F>(self, fields: F) -> Result<T, Stack>
    where
        F: FnOnce() -> FieldGroup,
    {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(assemble(
                &Config::DEFAULT,
                Underlying::Transparent(e.into()),
                None,
                fields(),
                1,
            )),
        }
    }

    #[inline(never)]
    #[track_caller]
    fn translate_err<C: ErrorCode>(self, code: C, fields: FieldGroup) -> Result<T, Stack> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(assemble(
                &Config::DEFAULT,
                Underlying::Transparent(e.into()),
                Some(Code::new(code)),
                fields,
                1,
            )),
        }
    }

    #[inline(never)]
    #[track_caller]
    fn opaque_err(self, fields: FieldGroup) -> Result<T, Stack> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(assemble(
                &Config::DEFAULT,
                Underlying::Opaque(e.into()),
                None,
                fields,
                1,
            )),
        }
    }
}

/// Turn a missing value into a coded stack
pub trait OptionExt<T> {
    /// `Some(v)` to `Ok(v)`, `None` to a new leaf stack with `code`
    fn ok_or_failure<C: ErrorCode>(self, code: C, fields: FieldGroup) -> Result<T, Stack>;
}

impl<T> OptionExt<T> for Option<T> {
    #[inline(never)]
    #[track_caller]
    fn ok_or_failure<C: ErrorCode>(self, code: C, fields: FieldGroup) -> Result<T, Stack> {
        match self {
            Some(value) => Ok(value),
            None => Err(assemble(
                &Config::DEFAULT,
                Underlying::None,
                Some(Code::new(code)),
                fields,
                1,
            )),
        }
    }
}
