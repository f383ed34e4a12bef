use std::fmt::Debug;

pub fn debug<E: Debug>(e: E) -> String {
    format!("{:?}", e)
}
