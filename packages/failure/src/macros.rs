//! Macros for building and returning stacks

/// Build a [`FieldGroup`](crate::FieldGroup) from field values
///
/// ```rust,ignore
/// let fields = fields![Message::new("no such user"), Context::from([("id", "42")])];
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::vec::Vec::<::std::boxed::Box<dyn $crate::Field>>::new()
    };
    ($($field:expr),+ $(,)?) => {
        ::std::vec![$(::std::boxed::Box::new($field) as ::std::boxed::Box<dyn $crate::Field>),+]
    };
}

/// Formatted [`Message`](crate::Message)
#[macro_export]
macro_rules! messagef {
    ($($arg:tt)+) => {
        $crate::Message::format(::std::format_args!($($arg)+))
    };
}

/// New leaf stack with a code and an optional formatted message
#[macro_export]
macro_rules! failure {
    ($code:expr $(,)?) => {
        $crate::new($code, $crate::fields![])
    };
    ($code:expr, $($arg:tt)+) => {
        $crate::new($code, $crate::fields![$crate::messagef!($($arg)+)])
    };
}

/// Return early with a [`failure!`]
#[macro_export]
macro_rules! bail {
    ($($arg:tt)+) => {
        return ::std::result::Result::Err(::std::convert::From::from($crate::failure!($($arg)+)))
    };
}

/// Return early with a [`failure!`] unless the condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::bail!($($arg)+);
        }
    };
}
