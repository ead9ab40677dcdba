//! `define_port_error!`: declares a `thiserror` enum for a driven port and
//! a snake_case constructor per variant whose fields accept `impl Into<T>`.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum RoomStoreError {
//!         Connection { message: String } => "connection failed: {message}",
//!     }
//! }
//! let err = RoomStoreError::connection("timed out");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*)
        $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum RoomStoreError {
            Connection { message: String } => "connection failed: {message}",
            Capacity { seats: u16 } => "room holds only {seats} people",
            Moved { room: String, floor: i8 } => "{room} moved to floor {floor}",
            Closed => "room is closed",
        }
    }

    #[rstest]
    fn string_fields_accept_borrowed_text() {
        let err = RoomStoreError::connection("timed out");
        assert_eq!(err.to_string(), "connection failed: timed out");
    }

    #[rstest]
    fn numeric_fields_keep_their_type() {
        let err = RoomStoreError::capacity(12_u16);
        assert_eq!(err, RoomStoreError::Capacity { seats: 12 });
    }

    #[rstest]
    fn mixed_fields_render_in_order() {
        let err = RoomStoreError::moved("Boardroom", -1_i8);
        assert_eq!(err.to_string(), "Boardroom moved to floor -1");
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(RoomStoreError::closed().to_string(), "room is closed");
    }
}
