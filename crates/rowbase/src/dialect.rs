//! Identifier quoting and placeholder styles.
//!
//! The compiler renders SQL in a dialect-neutral internal form with `?`
//! placeholders; [`Dialect`] decides how identifiers are quoted and whether
//! placeholders are renumbered to `$1..$n` in a finishing pass.

/// Target SQL flavor for compiled statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Backtick-quoted identifiers, `?` placeholders.
    #[default]
    MySql,
    /// Double-quoted identifiers, `$n` placeholders.
    Postgres,
}

impl Dialect {
    /// Quote a single identifier, escaping the quote character by doubling.
    ///
    /// Identifiers are quoted as given; no validation is performed.
    pub fn quote(&self, ident: &str) -> String {
        let q = match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        };
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(q);
        for ch in ident.chars() {
            if ch == q {
                out.push(q);
            }
            out.push(ch);
        }
        out.push(q);
        out
    }

    /// Quote `table`.`column` (or the dialect's equivalent).
    pub fn qualify(&self, table: &str, column: &str) -> String {
        format!("{}.{}", self.quote(table), self.quote(column))
    }

    /// Finish a compiled statement: for Postgres, renumber every `?` to
    /// `$1..$n` in left-to-right order. MySQL output is returned untouched.
    pub fn finish(&self, sql: String) -> String {
        match self {
            Dialect::MySql => sql,
            Dialect::Postgres => {
                let mut out = String::with_capacity(sql.len() + 8);
                let mut idx = 0usize;
                for ch in sql.chars() {
                    if ch == '?' {
                        idx += 1;
                        out.push('$');
                        out.push_str(&idx.to_string());
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}
