// Logging macros. These are no-ops unless the 'logging' feature is enabled,
// in which case they forward to the corresponding macros in the 'log' crate.
// Arguments are not evaluated when logging is disabled.

macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}

// A simple macro for defining bitfield accessors/mutators on a `Copy` type
// with a `bools` field. The mutator consumes and returns the value so that
// it can be used in a builder-like fashion.
macro_rules! define_bool {
    ($(#[$doc:meta])* $bit:literal, $is_fn_name:ident, $set_fn_name:ident) => {
        $(#[$doc])*
        pub fn $set_fn_name(mut self, yes: bool) -> Self {
            if yes {
                self.bools |= 1 << $bit;
            } else {
                self.bools &= !(1 << $bit);
            }
            self
        }

        #[doc = concat!(
            "Returns whether `", stringify!($set_fn_name), "` is enabled."
        )]
        pub fn $is_fn_name(&self) -> bool {
            self.bools & (0b1 << $bit) > 0
        }
    };
}
