use crate::Result;
use crate::cycle::Cycle;
use crate::module_io::ModuleIo;

/// A unit of flight computation, run once per tick.
pub trait Module {
    fn io(&self) -> &ModuleIo;
    fn io_mut(&mut self) -> &mut ModuleIo;

    /// Called once after settings are verified and before the first tick.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn process(&mut self, cycle: &Cycle);
}
