#![allow(dead_code)]

use std::sync::Arc;

use travbot_app::{
    app::BotBus,
    test_utils::{MockGame, MockGameOptions, mock_bus, mock_bus_with_config},
};
use travbot_game::test_utils::{VillageSitesFactoryOptions, village_sites_factory};
use travbot_types::{buildings::BuildingName, common::ResourceGroup};

/// A village that never runs short while builds are waited out.
pub fn rich_village(buildings: Vec<(u8, BuildingName, u8)>) -> MockGameOptions {
    MockGameOptions {
        sites: village_sites_factory(VillageSitesFactoryOptions {
            buildings,
            ..Default::default()
        }),
        production: ResourceGroup::new(50, 50, 50, 50),
        ..Default::default()
    }
}

pub fn setup_bus(options: MockGameOptions) -> (Arc<MockGame>, BotBus) {
    mock_bus(options)
}

pub fn setup_bus_with_login(options: MockGameOptions) -> (Arc<MockGame>, BotBus) {
    mock_bus_with_config(
        MockGameOptions {
            credentials: Some(("marcus".to_string(), "aquila".to_string())),
            ..options
        },
        |config| {
            config.username = Some("marcus".to_string());
            config.password = Some("aquila".to_string());
        },
    )
}
