use travbot_app::{
    command_handlers::DemolishBuildingsCommandHandler,
    cqrs::commands::DemolishBuildings,
    workflow::{DemolishedSite, DemolitionReport},
};
use travbot_types::{
    buildings::BuildingName,
    errors::{ApplicationError, WorkflowError},
};

mod common;

#[tokio::test]
async fn test_login_then_demolish() {
    let (game, bus) = common::setup_bus_with_login(common::rich_village(vec![
        (26, BuildingName::MainBuilding, 10),
        (21, BuildingName::Warehouse, 1),
        (22, BuildingName::Cranny, 2),
    ]));
    assert!(!game.is_logged_in());

    bus.login().await.unwrap();
    assert!(game.is_logged_in());

    let report = bus
        .execute(
            DemolishBuildings {
                site_ids: vec![21, 22],
            },
            DemolishBuildingsCommandHandler::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        report,
        DemolitionReport {
            sites: vec![
                DemolishedSite {
                    site_id: 21,
                    waited_secs: 30,
                },
                DemolishedSite {
                    site_id: 22,
                    waited_secs: 60,
                },
            ]
        }
    );
    assert_eq!(game.site(21), None);
    assert_eq!(game.site(22), Some((BuildingName::Cranny, 1)));
}

#[tokio::test]
async fn test_demolition_needs_a_session() {
    let (game, bus) = common::setup_bus_with_login(common::rich_village(vec![
        (26, BuildingName::MainBuilding, 10),
        (21, BuildingName::Warehouse, 1),
    ]));

    let result = bus
        .execute(
            DemolishBuildings { site_ids: vec![21] },
            DemolishBuildingsCommandHandler::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Workflow(WorkflowError::NavigationFailed { .. }))
    ));
    assert!(game.demolitions().is_empty());
}
