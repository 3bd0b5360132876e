pub mod docs_edit;
pub mod param_enums;
pub mod rules;
pub mod sheets_edit;

pub use docs_edit::{
    DocsDeleteRangeParams, DocsInsertTextParams, DocsListTablesParams, DocsReplaceRangeParams,
    DocsStyleRangeParams, DocsTableCellSetParams, docs_delete_range, docs_insert_text,
    docs_list_tables, docs_replace_range, docs_style_range, docs_table_cell_set,
};
pub use rules::{
    AddConditionalFormatParams, ClearConditionalFormatsParams, sheets_add_conditional_format,
    sheets_clear_conditional_formats,
};
pub use sheets_edit::{
    SheetsDeleteColumnsParams, SheetsDeleteRowsParams, SheetsFormatRangeParams,
    SheetsInsertColumnsParams, SheetsInsertRowsParams, SheetsListSheetsParams,
    SheetsMergeCellsParams, SheetsUnmergeCellsParams, sheets_delete_columns, sheets_delete_rows,
    sheets_format_range, sheets_insert_columns, sheets_insert_rows, sheets_list_sheets,
    sheets_merge_cells, sheets_unmerge_cells,
};
