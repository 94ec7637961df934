use alloy::sol;

sol! {
    contract MultiSend {
        function multiSend(bytes memory transactions) public payable;
    }
}
