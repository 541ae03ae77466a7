use cucumber::given;

use crate::cucumber::{world::DeliverySystem, DeliveryWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut DeliveryWorld) {
    let system = DeliverySystem::new().await;
    world.system = Some(system);
}
