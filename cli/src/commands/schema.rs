use faddt_core::error::FaddtError;

use crate::util::{fail, write_output};

pub fn run() -> i32 {
    let result = faddt_core::schema::schema_json()
        .map_err(FaddtError::from)
        .and_then(|json| write_output(None, &json));
    match result {
        Ok(()) => 0,
        Err(err) => fail(&err),
    }
}
