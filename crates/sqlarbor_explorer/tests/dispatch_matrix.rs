//! Exhaustive check that a command invoked on the wrong node kind is a
//! logged no-op: no SQL, no prompts, no panic.

use sqlarbor_core::{ConnectionProfile, DbConfig, GroupKind, NodeKind, NodePath};
use sqlarbor_explorer::{
    CommandDispatcher, CommandId, DispatchOutcome, ExplorerSession, ObjectNode,
};
use sqlarbor_test_support::{fixtures, FakeDriver, ScriptedHost};
use std::sync::Arc;
use uuid::Uuid;

fn node_of(kind: NodeKind, profile_id: Uuid) -> ObjectNode {
    let group = |group| NodePath::Group {
        profile_id,
        database: "shop".to_string(),
        group,
    };

    let path = match kind {
        NodeKind::Connection => NodePath::Connection { profile_id },
        NodeKind::Database => NodePath::Database {
            profile_id,
            database: "shop".into(),
        },
        NodeKind::TableGroup => group(GroupKind::Tables),
        NodeKind::ViewGroup => group(GroupKind::Views),
        NodeKind::ProcedureGroup => group(GroupKind::Procedures),
        NodeKind::FunctionGroup => group(GroupKind::Functions),
        NodeKind::TriggerGroup => group(GroupKind::Triggers),
        NodeKind::UserGroup => NodePath::UserGroup { profile_id },
        NodeKind::Table => NodePath::Table {
            profile_id,
            database: "shop".into(),
            name: "orders".into(),
        },
        NodeKind::Column => NodePath::Column {
            profile_id,
            database: "shop".into(),
            table: "orders".into(),
            name: "id".into(),
        },
        NodeKind::View => NodePath::View {
            profile_id,
            database: "shop".into(),
            name: "open_orders".into(),
        },
        NodeKind::Procedure => NodePath::Procedure {
            profile_id,
            database: "shop".into(),
            name: "close_day".into(),
        },
        NodeKind::Function => NodePath::Function {
            profile_id,
            database: "shop".into(),
            name: "order_total".into(),
        },
        NodeKind::Trigger => NodePath::Trigger {
            profile_id,
            database: "shop".into(),
            name: "orders_audit".into(),
        },
        NodeKind::User => NodePath::User {
            profile_id,
            name: "app".into(),
            host: "%".into(),
        },
    };

    ObjectNode {
        path,
        label: "probe".to_string(),
        detail: None,
    }
}

fn setup() -> (FakeDriver, Arc<ExplorerSession>, Uuid, Arc<ScriptedHost>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let driver = FakeDriver::new();
    fixtures::wire_shop_server(&driver);

    let session = Arc::new(ExplorerSession::new(driver.clone().as_driver_arc()));
    let profile = ConnectionProfile::new("local", DbConfig::default());
    let profile_id = profile.id;
    session.add_profile(profile);

    (driver, session, profile_id, Arc::new(ScriptedHost::new()))
}

#[test]
fn every_command_ignores_every_wrong_node_kind() {
    let (driver, session, profile_id, host) = setup();
    let dispatcher = CommandDispatcher::new(session, host.clone());

    for command in CommandId::ALL {
        let expected = command.expected_kinds();
        if expected.is_empty() {
            continue;
        }

        for kind in NodeKind::ALL {
            if expected.contains(&kind) {
                continue;
            }

            let node = node_of(kind, profile_id);
            let outcome = dispatcher.dispatch(command, Some(&node));
            assert_eq!(
                outcome,
                DispatchOutcome::WrongTarget,
                "{:?} on a {:?} node should be ignored",
                command,
                kind
            );
        }
    }

    // None of the mismatches reached the server or the user.
    assert!(driver.executed_sql().is_empty());
    assert!(host.confirm_prompts().is_empty());
    assert!(host.opened_editors().is_empty());
    assert!(host.errors().is_empty());
}

#[test]
fn node_requiring_commands_ignore_a_missing_node() {
    let (driver, session, _profile_id, host) = setup();
    let dispatcher = CommandDispatcher::new(session, host.clone());

    for command in CommandId::ALL {
        if command.expected_kinds().is_empty() {
            continue;
        }

        assert_eq!(
            dispatcher.dispatch(command, None),
            DispatchOutcome::WrongTarget,
            "{:?} without a node should be ignored",
            command
        );
    }

    assert!(driver.executed_sql().is_empty());
    assert!(host.errors().is_empty());
}

#[test]
fn node_free_commands_ignore_a_provided_node() {
    let (_driver, session, profile_id, host) = setup();
    let dispatcher = CommandDispatcher::new(session, host.clone());
    let stray = node_of(NodeKind::Table, profile_id);

    assert_eq!(
        dispatcher.dispatch(CommandId::Refresh, Some(&stray)),
        DispatchOutcome::Done
    );
    assert_eq!(
        dispatcher.dispatch(CommandId::OpenHistory, Some(&stray)),
        DispatchOutcome::Done
    );
}
