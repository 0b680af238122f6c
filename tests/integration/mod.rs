pub mod session_tests;
pub mod test_utils;

#[cfg(test)]
mod tests {
    use linkup_client::app_config::AppConfig;
    use linkup_client::commands::AppContext;

    #[tokio::test]
    async fn context_bootstraps_from_default_config() {
        let config = AppConfig::resolve(|_| None);
        let ctx = AppContext::bootstrap(config).expect("bootstrap should succeed");

        assert_eq!(ctx.api.base().as_str(), "http://localhost:8001/");
        assert_eq!(ctx.session.state().name(), "uninitialized");
    }
}
