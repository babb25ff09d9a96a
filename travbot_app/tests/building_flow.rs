use travbot_app::{
    command_handlers::{ConstructBuildingCommandHandler, LevelUpBuildingCommandHandler},
    cqrs::{
        commands::{ConstructBuilding, LevelUpBuilding},
        queries::GetVillageSnapshot,
    },
    queries_handlers::GetVillageSnapshotHandler,
    test_utils::{MockGameOptions, Submission},
    workflow::{BuildOptions, BuildOutcome},
};
use travbot_game::models::buildings::Building;
use travbot_types::{
    buildings::BuildingName,
    common::ResourceGroup,
    errors::{ApplicationError, PreconditionKind, WorkflowError},
};

mod common;

#[tokio::test]
async fn test_academy_from_an_empty_village() {
    let (game, bus) = common::setup_bus(common::rich_village(vec![]));

    let outcome = bus
        .execute(
            ConstructBuilding {
                name: BuildingName::Academy,
                options: BuildOptions::new(true, true),
            },
            ConstructBuildingCommandHandler::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        BuildOutcome::Completed {
            site_id: 21,
            building: BuildingName::Academy,
            duration_secs: 60,
        }
    );

    // requirements first, in declared order, each one waited out
    let built: Vec<(u8, BuildingName, u8)> = game
        .submissions()
        .into_iter()
        .map(|s| (s.site_id, s.building, s.level))
        .collect();
    assert_eq!(
        built,
        vec![
            (19, BuildingName::MainBuilding, 1),
            (19, BuildingName::MainBuilding, 2),
            (19, BuildingName::MainBuilding, 3),
            (39, BuildingName::RallyPoint, 1),
            (20, BuildingName::Barracks, 1),
            (20, BuildingName::Barracks, 2),
            (20, BuildingName::Barracks, 3),
            (21, BuildingName::Academy, 1),
        ]
    );
    assert_eq!(game.elapsed_secs(), 840);

    let snapshot = bus
        .query(GetVillageSnapshot, GetVillageSnapshotHandler::new())
        .await
        .unwrap();
    assert!(snapshot.satisfies(&BuildingName::MainBuilding, 3));
    assert!(snapshot.satisfies(&BuildingName::Barracks, 3));
    assert!(snapshot.is_built(&BuildingName::RallyPoint));
    assert_eq!(
        snapshot.highest(&BuildingName::Academy),
        Some(Building::new(21, 1))
    );
}

#[tokio::test]
async fn test_missing_requirement_stops_an_unforced_construction() {
    let (game, bus) = common::setup_bus(common::rich_village(vec![
        (26, BuildingName::MainBuilding, 1),
        (19, BuildingName::Warehouse, 1),
    ]));

    let result = bus
        .execute(
            ConstructBuilding {
                name: BuildingName::Marketplace,
                options: BuildOptions::new(false, false),
            },
            ConstructBuildingCommandHandler::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Workflow(WorkflowError::DependencyUnmet {
            building: BuildingName::Granary,
            level: 1,
        }))
    ));
    assert!(game.submissions().is_empty());
}

#[tokio::test]
async fn test_forced_construction_builds_the_missing_requirement() {
    let (game, bus) = common::setup_bus(common::rich_village(vec![
        (26, BuildingName::MainBuilding, 1),
        (19, BuildingName::Warehouse, 1),
    ]));

    let outcome = bus
        .execute(
            ConstructBuilding {
                name: BuildingName::Marketplace,
                options: BuildOptions::new(true, false),
            },
            ConstructBuildingCommandHandler::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        BuildOutcome::Submitted {
            site_id: 21,
            building: BuildingName::Marketplace,
            duration_secs: 60,
        }
    );
    assert_eq!(game.site(20), Some((BuildingName::Granary, 1)));
    // not waited for
    assert_eq!(game.site(21), Some((BuildingName::Marketplace, 0)));
}

#[tokio::test]
async fn test_level_up_enlarges_the_warehouse_first() {
    let (game, bus) =
        common::setup_bus(common::rich_village(vec![(26, BuildingName::MainBuilding, 10)]));
    let (game_slow, bus_slow) = common::setup_bus(MockGameOptions {
        production: ResourceGroup::new(5, 5, 5, 5),
        ..common::rich_village(vec![(26, BuildingName::MainBuilding, 10)])
    });

    let command = LevelUpBuilding {
        site_id: 26,
        options: BuildOptions::new(true, false),
    };

    let outcome = bus
        .execute(command.clone(), LevelUpBuildingCommandHandler::new())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        BuildOutcome::Submitted {
            site_id: 26,
            building: BuildingName::MainBuilding,
            duration_secs: 660,
        }
    );
    assert_eq!(
        game.submissions(),
        vec![
            Submission {
                site_id: 19,
                building: BuildingName::Warehouse,
                level: 1,
            },
            Submission {
                site_id: 26,
                building: BuildingName::MainBuilding,
                level: 11,
            },
        ]
    );

    // with a slow village the bigger warehouse still has to fill up
    bus_slow
        .execute(command, LevelUpBuildingCommandHandler::new())
        .await
        .unwrap();
    assert_eq!(game_slow.site(19), Some((BuildingName::Warehouse, 1)));
    assert_eq!(game_slow.elapsed_secs(), 60 + 16);
}

#[tokio::test]
async fn test_unforced_level_up_reports_the_small_warehouse() {
    let (game, bus) =
        common::setup_bus(common::rich_village(vec![(26, BuildingName::MainBuilding, 10)]));

    let result = bus
        .execute(
            LevelUpBuilding {
                site_id: 26,
                options: BuildOptions::default(),
            },
            LevelUpBuildingCommandHandler::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Workflow(WorkflowError::PreconditionUnmet(
            PreconditionKind::Storage(_)
        )))
    ));
    assert!(game.submissions().is_empty());
}

#[tokio::test]
async fn test_cranny_stops_at_max_level() {
    let (game, bus) = common::setup_bus(common::rich_village(vec![
        (26, BuildingName::MainBuilding, 1),
        (20, BuildingName::Cranny, 9),
    ]));
    let level_up = || LevelUpBuilding {
        site_id: 20,
        options: BuildOptions::new(true, true),
    };

    let outcome = bus
        .execute(level_up(), LevelUpBuildingCommandHandler::new())
        .await
        .unwrap();
    assert!(matches!(outcome, BuildOutcome::Completed { site_id: 20, .. }));
    assert_eq!(game.site(20), Some((BuildingName::Cranny, 10)));

    let result = bus
        .execute(level_up(), LevelUpBuildingCommandHandler::new())
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Workflow(WorkflowError::MaxLevel { site_id: 20 }))
    ));
    assert_eq!(game.submissions().len(), 1);
}

#[tokio::test]
async fn test_forced_waits_are_bounded() {
    let (game, bus) = common::setup_bus(MockGameOptions {
        stock: ResourceGroup::new(0, 0, 0, 0),
        production: ResourceGroup::new(0, 0, 0, 0),
        ..common::rich_village(vec![(26, BuildingName::MainBuilding, 1)])
    });

    let result = bus
        .execute(
            LevelUpBuilding {
                site_id: 26,
                options: BuildOptions::new(true, true),
            },
            LevelUpBuildingCommandHandler::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Workflow(WorkflowError::RetryBudgetExhausted(
            PreconditionKind::Resources
        )))
    ));
    assert!(game.submissions().is_empty());
}

#[tokio::test]
async fn test_inspection_is_idempotent() {
    let (game, bus) = common::setup_bus(common::rich_village(vec![
        (26, BuildingName::MainBuilding, 5),
        (40, BuildingName::CityWall, 2),
    ]));

    let first = bus
        .query(GetVillageSnapshot, GetVillageSnapshotHandler::new())
        .await
        .unwrap();
    let second = bus
        .query(GetVillageSnapshot, GetVillageSnapshotHandler::new())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.occurrences(&BuildingName::CityWall),
        &[Building::new(40, 2)]
    );
    assert!(game.submissions().is_empty());
    assert_eq!(game.elapsed_secs(), 0);
}
