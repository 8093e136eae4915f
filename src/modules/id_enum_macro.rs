/// Declares a string-keyed identifier enum with a `Custom(String)` fallback.
///
/// Each variant maps to a stable serialisation key and a display name. Keys that
/// don't match a known variant deserialise into `Custom`, so third-party
/// registrations can round-trip through JSON without code changes.
#[macro_export]
macro_rules! define_id_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $key:literal : $display_name:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Custom(String),
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.key())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from_key(&s))
            }
        }

        impl $enum_name {
            /// Stable machine key, e.g. `"laravel"`.
            pub fn key(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $key,
                    )*
                    Self::Custom(key) => key.as_str(),
                }
            }

            /// Human-readable name.
            pub fn name(&self) -> String {
                match self {
                    $(
                        Self::$variant => $display_name.to_string(),
                    )*
                    Self::Custom(key) => key.clone(),
                }
            }

            pub fn from_key(key: &str) -> Self {
                match key {
                    $(
                        $key => Self::$variant,
                    )*
                    other => Self::Custom(other.to_string()),
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}
