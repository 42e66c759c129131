//! Unit tests for declared-network normalization

use super::*;
use openstack_client::mock::helpers::network;
use openstack_client::MockOpenStackClient;

async fn normalize(
    mock: &MockOpenStackClient,
    declared: &[DeclaredNetwork],
) -> Result<Vec<ResolvedNetwork>, ReconcileError> {
    normalize_declared(&RequestContext::background(), mock, mock, declared).await
}

#[test]
fn test_lookup_target_priority() {
    let all = DeclaredNetwork {
        uuid: "u".to_string(),
        port: "p".to_string(),
        ..DeclaredNetwork::default()
    };
    assert_eq!(all.lookup_target(), Some(LookupTarget::Port("p".to_string())));

    let id_and_port_free = DeclaredNetwork::by_uuid("u");
    assert_eq!(
        id_and_port_free.lookup_target(),
        Some(LookupTarget::Network(NetworkQuery::Id("u".to_string())))
    );

    let complete = DeclaredNetwork {
        uuid: "u".to_string(),
        name: "n".to_string(),
        port: "p".to_string(),
        ..DeclaredNetwork::default()
    };
    assert_eq!(complete.lookup_target(), None);
}

#[tokio::test]
async fn test_empty_entry_is_invalid() {
    let mock = MockOpenStackClient::new();
    mock.add_active_network("private");

    let result = normalize(
        &mock,
        &[DeclaredNetwork::by_name("private"), DeclaredNetwork::default()],
    )
    .await;

    assert!(matches!(result, Err(ReconcileError::InvalidConfiguration(ref m)) if m.contains("#1")));
}

#[tokio::test]
async fn test_complete_entry_skips_lookup() {
    let mock = MockOpenStackClient::new();
    let declared = DeclaredNetwork {
        uuid: "u-1".to_string(),
        name: "private".to_string(),
        port: "port-that-does-not-exist".to_string(),
        fixed_ip_v4: "10.0.0.10".to_string(),
        access_network: true,
    };

    let resolved = normalize(&mock, std::slice::from_ref(&declared)).await.expect("no lookup needed");

    assert_eq!(mock.lookup_count(), 0);
    assert_eq!(resolved[0].uuid, "u-1");
    assert_eq!(resolved[0].name, "private");
    assert_eq!(resolved[0].port, "port-that-does-not-exist");
    assert_eq!(resolved[0].fixed_ip_v4, "10.0.0.10");
    assert!(resolved[0].access_network);
}

#[tokio::test]
async fn test_name_lookup_fills_uuid() {
    let mock = MockOpenStackClient::new();
    let private = mock.add_active_network("private");

    let resolved = normalize(&mock, &[DeclaredNetwork::by_name("private")]).await.expect("resolves");

    assert_eq!(resolved[0].uuid, private.id);
    assert_eq!(resolved[0].name, "private");
}

#[tokio::test]
async fn test_uuid_lookup_fills_name() {
    let mock = MockOpenStackClient::new();
    mock.add_network(network("net-42", "backend", "ACTIVE"));

    let resolved = normalize(&mock, &[DeclaredNetwork::by_uuid("net-42")]).await.expect("resolves");

    assert_eq!(resolved[0].name, "backend");
    assert_eq!(mock.calls(), vec!["lookup_network id=net-42".to_string()]);
}

#[tokio::test]
async fn test_port_lookup_resolves_through_network() {
    let mock = MockOpenStackClient::new();
    mock.add_network(network("net-7", "storage", "ACTIVE"));
    mock.add_port("port-1", "net-7");

    let declared = DeclaredNetwork {
        name: "ignored-for-lookup".to_string(),
        port: "port-1".to_string(),
        ..DeclaredNetwork::default()
    };
    let resolved = normalize(&mock, &[declared]).await.expect("resolves");

    assert_eq!(
        mock.calls(),
        vec![
            "lookup_port_network port-1".to_string(),
            "lookup_network id=net-7".to_string(),
        ]
    );
    assert_eq!(resolved[0].uuid, "net-7");
    // Declared fields are never overwritten
    assert_eq!(resolved[0].name, "ignored-for-lookup");
    assert_eq!(resolved[0].port, "port-1");
}

#[tokio::test]
async fn test_missing_port_fails_before_network_lookup() {
    let mock = MockOpenStackClient::new();

    let result = normalize(&mock, &[DeclaredNetwork::by_port("ghost")]).await;

    assert!(matches!(result, Err(ReconcileError::NotFound(_))));
    assert_eq!(mock.calls(), vec!["lookup_port_network ghost".to_string()]);
}

#[tokio::test]
async fn test_duplicate_port_fails_before_network_lookup() {
    let mock = MockOpenStackClient::new();
    mock.add_port("p", "n1");
    mock.add_port("p", "n2");

    let result = normalize(&mock, &[DeclaredNetwork::by_port("p")]).await;

    assert!(matches!(result, Err(ReconcileError::AmbiguousResult(_))));
    assert_eq!(mock.calls(), vec!["lookup_port_network p".to_string()]);
}

#[tokio::test]
async fn test_invalid_entry_is_rejected_before_any_lookup() {
    let mock = MockOpenStackClient::new();
    mock.add_active_network("private");

    let result = normalize(
        &mock,
        &[DeclaredNetwork::by_name("private"), DeclaredNetwork::default()],
    )
    .await;

    assert!(matches!(result, Err(ReconcileError::InvalidConfiguration(_))));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_inactive_network_is_not_found() {
    let mock = MockOpenStackClient::new();
    mock.add_network(network("net-1", "private", "BUILD"));

    let result = normalize(&mock, &[DeclaredNetwork::by_name("private")]).await;
    assert!(matches!(result, Err(ReconcileError::NotFound(_))));
}

#[tokio::test]
async fn test_ambiguous_name_aborts_whole_list() {
    let mock = MockOpenStackClient::new();
    mock.add_active_network("first");
    mock.add_active_network("dup");
    mock.add_active_network("dup");

    let result = normalize(
        &mock,
        &[DeclaredNetwork::by_name("first"), DeclaredNetwork::by_name("dup")],
    )
    .await;

    assert!(matches!(result, Err(ReconcileError::AmbiguousResult(_))));
}

#[tokio::test]
async fn test_service_error_is_wrapped_with_context() {
    let mock = MockOpenStackClient::new();
    mock.fail_network_lookups("503 Service Unavailable");

    let result = normalize(&mock, &[DeclaredNetwork::by_name("private")]).await;

    match result {
        Err(ReconcileError::Lookup { context, .. }) => {
            assert_eq!(context, "looking up network name=private");
        }
        other => panic!("expected lookup error, got {:?}", other),
    }
}
