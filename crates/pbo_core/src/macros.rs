/// Build a labelled polynomial from `[labels] => coefficient` entries.
///
/// The domain comes from the binding's type:
///
/// ```
/// use pbo_core::{poly, HIsing};
///
/// let h: HIsing = poly! { ["a"] => -1, ["a", "b"] => -3, [] => -2 };
/// assert_eq!(h.num_terms(), 3);
/// ```
#[macro_export]
macro_rules! poly {
    ($( [ $($var:expr),* $(,)? ] => $c:expr ),* $(,)?) => {{
        let entries: ::std::vec::Vec<(::std::vec::Vec<$crate::Label>, $crate::Coefficient)> = vec![
            $( (vec![$($crate::Label::from($var)),*], $crate::Coefficient::from($c)) ),*
        ];
        $crate::Polynomial::from_terms(entries)
    }};
}
