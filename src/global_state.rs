use leptos::*;
use once_cell::sync::OnceCell;

/// Page-wide UI state shared by every mounted chart.
pub struct Globals {
    /// An export is running; export buttons disable while set.
    pub exporting: RwSignal<bool>,
    /// Last export failure, shown as a dismissable notice.
    pub export_notice: RwSignal<Option<String>>,
    pub mounted_charts: RwSignal<usize>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        exporting: create_rw_signal(false),
        export_notice: create_rw_signal(None),
        mounted_charts: create_rw_signal(0),
    })
}

crate::global_signals! {
    pub exporting => exporting: bool,
    pub export_notice => export_notice: Option<String>,
    pub mounted_charts => mounted_charts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // single test: the OnceCell table is shared process-wide
    #[test]
    fn generated_accessors_read_the_shared_table() {
        let runtime = create_runtime();

        exporting().set(true);
        assert!(globals().exporting.get_untracked());

        export_notice().set(Some("export failed".to_string()));
        assert_eq!(export_notice().get_untracked(), Some("export failed".to_string()));

        mounted_charts().set(2);
        assert_eq!(mounted_charts().get_untracked(), 2);

        runtime.dispose();
    }
}
