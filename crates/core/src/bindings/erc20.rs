use alloy::sol;

sol! {
    contract ERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}
