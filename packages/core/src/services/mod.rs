pub mod rpc;

#[cfg(test)]
pub mod mock_rpc;
