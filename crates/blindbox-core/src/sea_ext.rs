use sea_orm::{
    ColumnTrait, EntityTrait, Order, QueryOrder, Select,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

pub trait OrderByRandom {
    fn order_by_random(self) -> Self;
}

impl<E> OrderByRandom for Select<E>
where
    E: EntityTrait,
{
    fn order_by_random(mut self) -> Self {
        QueryOrder::query(&mut self)
            .order_by_expr(SimpleExpr::FunctionCall(Func::random()), Order::Desc);
        self
    }
}

/// `LOWER(col) = LOWER(value)`: case-insensitive exact match.
pub fn eq_ci<C: ColumnTrait>(col: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((col.entity_name(), col)))).eq(value.to_lowercase())
}

/// `LOWER(col) LIKE '%needle%'` with `%`, `_` and `\` in the needle escaped.
pub fn contains_ci<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((col.entity_name(), col))))
        .like(LikeExpr::new(like_pattern(needle)).escape('\\'))
}

fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
