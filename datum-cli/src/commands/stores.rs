use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "stores",
    about = "List the element types available in this environment"
)]
pub struct Stores {}

impl Stores {
    pub fn run(&self) -> Result<(), AppError> {
        for kind in super::registry().kinds() {
            println!("{kind}");
        }
        Ok(())
    }
}
