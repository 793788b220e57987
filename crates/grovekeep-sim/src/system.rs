use crate::world::World;

/// One stage of the frame pipeline. Systems run in registration order,
/// each once per [`World::update`].
pub trait System {
    fn name(&self) -> &'static str;

    /// Advance by `dt` seconds. May read and write any entity's components.
    fn update(&mut self, world: &mut World, dt: f32);
}
