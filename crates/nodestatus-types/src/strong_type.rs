/// Declares an opaque integer identity as a transparent newtype.
///
/// The generated type is `Copy`, totally ordered and hashable so it can key
/// the monitor's maps, serializes as the bare integer, and displays as the
/// bare integer so it can be spliced into series names.
#[macro_export]
macro_rules! strong_type {
    ($(#[$meta:meta])* $name:ident, $inner:ty) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Default,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            #[inline]
            pub const fn new(raw: $inner) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::num::ParseIntError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                s.trim().parse::<$inner>().map(Self)
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(raw: $inner) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    strong_type!(
        /// Identity used only by these tests.
        ProbeId,
        i64
    );

    #[test]
    fn test_new_and_get() {
        const ID: ProbeId = ProbeId::new(42);
        assert_eq!(ID.get(), 42);
        assert_eq!(ID, ProbeId(42));
    }

    #[test]
    fn test_display_is_bare_integer() {
        assert_eq!(ProbeId(7).to_string(), "7");
        assert_eq!(format!("{:?}", ProbeId(7)), "ProbeId(7)");
        assert_eq!(format!("store.{}", ProbeId(-3)), "store.-3");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(" 12 ".parse::<ProbeId>().unwrap(), ProbeId(12));
        assert!("twelve".parse::<ProbeId>().is_err());
    }

    #[test]
    fn test_ordering_keys_maps() {
        let ids: BTreeSet<ProbeId> = [3, 1, 2, 1].into_iter().map(ProbeId::from).collect();
        let raw: Vec<i64> = ids.into_iter().map(i64::from).collect();
        assert_eq!(raw, vec![1, 2, 3]);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ProbeId(99)).unwrap();
        assert_eq!(json, "99");
        let parsed: ProbeId = serde_json::from_str("99").unwrap();
        assert_eq!(parsed, ProbeId(99));
    }
}
