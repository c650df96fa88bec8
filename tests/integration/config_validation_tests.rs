//! Configuration loading integration tests
//!
//! Loads configuration files from disk and checks that invalid files are rejected
//! with configuration errors.

#[cfg(test)]
mod tests {
    use intime_access::core::models::{EntityType, OwnershipFilter};
    use intime_access::{AccessError, Config};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/access.example.yaml");

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// The shipped example loads and validates
    #[tokio::test]
    async fn test_example_config_loads() {
        let config = Config::from_file(EXAMPLE_CONFIG).await.unwrap();

        assert_eq!(config.policy().default_mode, OwnershipFilter::MyItems);
        assert!(!config.policy().prune_consulted_clause);
        assert!(!config.hierarchy().shared_cache);
        assert!(!config.database().enabled);

        let registry = config.registry();
        assert_eq!(registry.len(), 13);
        let course = registry.resolve(&EntityType::from("course")).unwrap();
        assert_eq!(course.owner_column, "instructor_id");
        assert_eq!(course.organization_column, "org_id");
    }

    /// Omitted sections fall back to defaults
    #[tokio::test]
    async fn test_minimal_config_uses_defaults() {
        let file = write_config("policy:\n  default_mode: all_accessible\n");
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.policy().default_mode, OwnershipFilter::AllAccessible);
        assert_eq!(config.policy().admin_roles, vec!["super_admin", "admin"]);
        assert!(config.registry().contains(&EntityType::from("job")));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let file = write_config("policy:\n  manager_roles: [manager, team_lead]\n");
        let err = Config::from_file(file.path()).await.unwrap_err();

        assert!(matches!(err, AccessError::Configuration(_)));
        assert!(err.to_string().contains("team_lead"));
    }

    #[tokio::test]
    async fn test_duplicate_entity_rejected() {
        let file = write_config(
            "entities:\n  - { name: job, table: jobs }\n  - { name: job, table: jobs_v2 }\n",
        );
        let err = Config::from_file(file.path()).await.unwrap_err();

        assert!(matches!(err, AccessError::Configuration(_)));
        assert!(err.to_string().contains("registered twice"));
    }

    #[tokio::test]
    async fn test_unsafe_column_name_rejected() {
        let file = write_config(
            "entities:\n  - { name: job, table: jobs, owner_column: \"owner; drop table jobs\" }\n",
        );
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unknown_mode_rejected() {
        let file = write_config("policy:\n  default_mode: everything\n");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let err = Config::from_file("/nonexistent/access.yaml").await.unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
    }

    /// Enabling the shared cache requires usable bounds
    #[tokio::test]
    async fn test_shared_cache_bounds_validated() {
        let file = write_config("hierarchy:\n  shared_cache: true\n  shared_cache_ttl_secs: 0\n");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("TTL"));
    }

    #[tokio::test]
    async fn test_yaml_round_trip() {
        let config = Config::from_file(EXAMPLE_CONFIG).await.unwrap();
        let file = write_config(&config.to_yaml().unwrap());
        let reloaded = Config::from_file(file.path()).await.unwrap();
        assert_eq!(reloaded, config);
    }
}
