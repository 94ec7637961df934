use alloy::sol;

sol! {
    contract ERC721 {
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
    }
}
