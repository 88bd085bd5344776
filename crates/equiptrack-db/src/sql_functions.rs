diesel::define_sql_function! {
    /// SQL `lower`, used for case-insensitive email matching.
    fn lower(input: diesel::sql_types::Text) -> diesel::sql_types::Text;
}
