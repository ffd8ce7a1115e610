/// Declares a configuration enum that is spelled the same way in config files, chain files and
/// on the command line.
///
/// Every `#[strum(serialize = ..)]` alias is accepted by both serde and clap. Deserialization
/// ignores surrounding whitespace and falls back to a lowercase match.
macro_rules! config_enum {
    ($(#[$attr:meta])* $vis:vis enum $name:ident { $( $(#[$var_attr:meta])* $var:ident),* $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[derive(strum::IntoStaticStr, strum::EnumIter, strum::EnumString, strum::VariantNames)]
        #[derive(strum::EnumIs, strum::EnumMessage)]
        $(#[$attr])*
        $vis enum $name {
            $(
                $(#[$var_attr])*
                $var
            ),*
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.to_str())
            }
        }

        #[cfg(feature = "clap")]
        impl clap::ValueEnum for $name {
            fn value_variants<'a>() -> &'a [Self] {
                &[$(Self::$var),*]
            }

            fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
                let name = self.to_str();
                Some(clap::builder::PossibleValue::new(name).aliases(self.aliases()))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.to_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                let s = s.trim();
                s.parse()
                    .or_else(|_| s.to_ascii_lowercase().parse())
                    .map_err(|_| {
                        serde::de::Error::unknown_variant(
                            s,
                            <Self as strum::VariantNames>::VARIANTS,
                        )
                    })
            }
        }

        impl $name {
            /// Returns the canonical spelling of `self`.
            pub fn to_str(self) -> &'static str {
                self.into()
            }

            /// Returns the other accepted spellings of `self`.
            #[cfg_attr(not(feature = "clap"), allow(dead_code))]
            fn aliases(self) -> impl Iterator<Item = &'static str> {
                let name = self.to_str();
                strum::EnumMessage::get_serializations(&self)
                    .iter()
                    .copied()
                    .filter(move |alias| *alias != name)
            }
        }
    };
}
