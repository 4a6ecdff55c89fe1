/// Reasons [`crate::ListAdapter::new`] rejects its options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("adapter options are missing the `create_elements` factory")]
    MissingCreateElements,
    #[error("adapter options are missing the `update_element` callback")]
    MissingUpdateElement,
}
