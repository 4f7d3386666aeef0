extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derives JSON helpers backed by `serde_json`.
///
/// The type must implement `Serialize` and `Deserialize`. Besides single values,
/// the generated `list_*` functions handle JSON arrays of the type, which is how
/// collections are persisted.
#[proc_macro_derive(Json)]
pub fn json_macro(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;
    let expanded = quote! {
        impl #name {
            pub fn to_string(&self) -> anyhow::Result<String> {
                serde_json::to_string(&self).map_err(anyhow::Error::msg)
            }

            pub fn from_string<'a>(str: impl Into<&'a str>) -> anyhow::Result<Self> {
                serde_json::from_str(str.into()).map_err(anyhow::Error::msg)
            }

            pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
                serde_json::from_value(value).map_err(anyhow::Error::msg)
            }

            pub fn to_value(&self) -> anyhow::Result<serde_json::Value> {
                serde_json::to_value(self).map_err(anyhow::Error::msg)
            }

            pub fn list_to_string(items: &[Self]) -> anyhow::Result<String> {
                serde_json::to_string(items).map_err(anyhow::Error::msg)
            }

            pub fn list_to_string_pretty(items: &[Self]) -> anyhow::Result<String> {
                serde_json::to_string_pretty(items).map_err(anyhow::Error::msg)
            }

            pub fn list_from_string(str: &str) -> anyhow::Result<Vec<Self>> {
                serde_json::from_str(str).map_err(anyhow::Error::msg)
            }
        }
    };

    TokenStream::from(expanded)
}
