use ejournal_core::workflows::listing;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::print_listing;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;

    let mut rows = listing(&journal)?;
    if args.count > 0 {
        rows.truncate(args.count);
    }

    print_listing(&rows, args.json, ctx.quiet())
}
