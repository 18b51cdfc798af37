use crate::cli::{ActionArgs, OutputOptions};
use crate::error::Result;
use crate::resources::{DatasetAction, Datasets, Resource};

use super::interactive::require_confirmation;
use super::{connect, run_mutation};

/// Run a row action after confirmation
pub async fn cmd_action<R: Resource>(args: ActionArgs) -> Result<()> {
    let action: R::Action = args.action.parse()?;
    run_row_action::<R>(
        action,
        &args.id,
        args.remark.as_deref(),
        args.yes,
        args.output,
    )
    .await
}

/// Delete a dataset
pub async fn cmd_dataset_delete(id: &str, yes: bool, output: OutputOptions) -> Result<()> {
    run_row_action::<Datasets>(DatasetAction::Delete, id, None, yes, output).await
}

async fn run_row_action<R: Resource>(
    action: R::Action,
    id: &str,
    remark: Option<&str>,
    yes: bool,
    output: OutputOptions,
) -> Result<()> {
    require_confirmation(R::prompt(action), yes)?;
    let (_, client) = connect()?;
    let spec = R::mutation(action, id, remark);
    run_mutation(&client, &spec, output).await?;
    Ok(())
}
