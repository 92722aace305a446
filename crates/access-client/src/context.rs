use crate::error::AccessError;

/// Host-side URL building capability handed to an adapter at construction.
pub trait AccessContext: Send + Sync {
    /// Expand placeholders in `template`.
    ///
    /// `use_auth_data` controls whether data from a previous authorization
    /// response may be embedded. Failures surface unchanged to the adapter's caller.
    fn build_url(
        &self,
        template: &str,
        use_auth_data: bool,
    ) -> impl std::future::Future<Output = Result<String, AccessError>> + Send;
}

impl<C: AccessContext> AccessContext for std::sync::Arc<C> {
    fn build_url(
        &self,
        template: &str,
        use_auth_data: bool,
    ) -> impl std::future::Future<Output = Result<String, AccessError>> + Send {
        (**self).build_url(template, use_auth_data)
    }
}
