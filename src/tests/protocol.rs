#[cfg(test)]
mod tests {
    use crate::cache::token::CachedToken;
    use crate::helper::{Helper, HelperOptions};
    use crate::helpers::time::now_i64;
    use crate::protocol::{serve, Action, CredentialsResponse, ProtocolError, ERR_CREDENTIALS_NOT_FOUND, ERR_MISSING_SERVER_URL};
    use crate::tests::common::{config_with_file_sink, write_cached_token, MockStore};

    fn helper_with_cached_token(dir: &tempfile::TempDir, store: MockStore) -> Helper<MockStore> {
        let sink_path = dir.path().join("token");
        write_cached_token(&sink_path, &CachedToken::new("s.cached".into(), now_i64() + 3600, false));
        Helper::new(HelperOptions {
            client: Some(store),
            config: Some(config_with_file_sink(&sink_path.to_string_lossy(), 10)),
            config_path: None,
        })
    }

    #[tokio::test]
    async fn get_answers_with_docker_credentials_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut helper = helper_with_cached_token(&dir, MockStore::default().with_secret("s.cached", "robot", "pw"));
        let mut output = Vec::new();

        serve(&mut helper, Action::Get, &b"https://registry.example.com\n"[..], &mut output)
            .await
            .unwrap();

        let response: CredentialsResponse = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            response,
            CredentialsResponse {
                server_url: "https://registry.example.com".into(),
                username: "robot".into(),
                secret: "pw".into(),
            }
        );
        let raw: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(raw["ServerURL"], "https://registry.example.com");
        assert_eq!(raw["Username"], "robot");
        assert_eq!(raw["Secret"], "pw");
    }

    #[tokio::test]
    async fn get_without_credentials_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        // cached token has no access and the token login cannot resolve its env var
        let mut helper = helper_with_cached_token(&dir, MockStore::default());
        let mut output = Vec::new();

        let err = serve(&mut helper, Action::Get, &b"registry.example.com"[..], &mut output)
            .await
            .unwrap_err();

        assert!(matches!(err, ProtocolError::NotFound));
        assert_eq!(err.to_string(), ERR_CREDENTIALS_NOT_FOUND);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn get_requires_a_server_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut helper = helper_with_cached_token(&dir, MockStore::default());
        let mut output = Vec::new();

        let err = serve(&mut helper, Action::Get, &b"  \n"[..], &mut output).await.unwrap_err();
        assert!(matches!(err, ProtocolError::MissingServerUrl));
        assert_eq!(err.to_string(), ERR_MISSING_SERVER_URL);
    }

    #[tokio::test]
    async fn store_erase_and_list_are_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let mut helper = helper_with_cached_token(&dir, MockStore::default());

        for action in [Action::Store, Action::Erase, Action::List] {
            let mut output = Vec::new();
            let err = serve(&mut helper, action, &b"{}"[..], &mut output).await.unwrap_err();
            assert!(matches!(err, ProtocolError::NotImplemented));
            assert!(output.is_empty());
        }
    }

    #[tokio::test]
    async fn version_prints_the_banner() {
        let dir = tempfile::tempdir().unwrap();
        let mut helper = helper_with_cached_token(&dir, MockStore::default());
        let mut output = Vec::new();

        serve(&mut helper, Action::Version, &b""[..], &mut output).await.unwrap();

        let banner = String::from_utf8(output).unwrap();
        assert!(banner.contains(env!("CARGO_PKG_VERSION")));
    }
}
